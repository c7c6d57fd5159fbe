pub mod collision;
pub mod components;
pub mod death;
pub mod frightened;
pub mod item;
pub mod mode;
pub mod movement;
pub mod targeting;
