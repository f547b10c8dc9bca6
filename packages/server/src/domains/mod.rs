// Domain modules

pub mod assets;
pub mod notifications;
