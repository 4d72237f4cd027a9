pub mod block;
pub mod ledger;
pub mod json;
pub mod time;

pub mod prelude {
    pub use super::block::prelude::*;

    pub use super::ledger::{Ledger, LedgerError};
    pub use super::json::{AsJson, AsJsonError};
}
