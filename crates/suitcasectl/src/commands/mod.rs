mod analyze;
mod find;
mod keys;
mod suitcase;
mod tree;

use anyhow::Result;
use suitcasectl_options::{Command, CreateTarget};

pub(crate) async fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Create { target } => match target {
            CreateTarget::Suitcase(args) => suitcase::handle(args).await,
            CreateTarget::Keys(args) => keys::handle(args),
        },
        Command::Analyze(args) => analyze::handle(args),
        Command::Find(args) => find::handle(args),
        Command::Tree(args) => tree::handle(args),
    }
}
