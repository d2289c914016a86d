//! One module per subcommand, each exposing `execute`.

pub mod add;
pub mod audit_cmd;
pub mod backup;
pub mod change_passphrase;
pub mod completions;
pub mod copy;
pub mod delete;
pub mod edit;
pub mod export;
pub mod generate;
pub mod get;
pub mod import_cmd;
pub mod init;
pub mod list;
pub mod move_cmd;
pub mod restore;
pub mod search;
