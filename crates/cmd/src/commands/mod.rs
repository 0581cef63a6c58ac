pub mod apply;
pub mod run;
pub mod show;
pub mod verify;

pub use apply::apply_command;
pub use run::run_command;
pub use show::show_command;
pub use verify::verify_command;
