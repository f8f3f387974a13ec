pub mod builtin;
pub mod builtins;
pub mod external;

pub use builtin::{Builtin, BuiltinContext};
pub use external::{spawn_stage, StageIo};
