/// Path lookup shorthand command.
pub mod get;
/// Payload materialization command.
pub mod materialize;
/// Value tree printer.
pub mod print;
/// Schema inspection command.
pub mod schema;
