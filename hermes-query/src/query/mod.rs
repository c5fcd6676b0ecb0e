//! Query types, scorers and boolean composition

mod all;
mod bm25;
mod boolean;
mod boost;
mod bulk;
mod clause;
mod collector;
mod conjunction;
mod constant;
pub mod cost;
mod disjunction;
mod docset;
mod exclusion;
pub mod lead_cost;
pub mod mode;
mod req_opt;
mod term;
mod traits;

pub use all::*;
pub use bm25::*;
pub use boolean::*;
pub use boost::*;
pub use bulk::*;
pub use clause::*;
pub use collector::*;
pub use conjunction::*;
pub use constant::*;
pub use disjunction::*;
pub use docset::*;
pub use exclusion::*;
pub use mode::ExecutionMode;
pub use req_opt::*;
pub use term::*;
pub use traits::*;
