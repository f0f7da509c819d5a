//! Domain types for OBLab

pub mod bar;
pub mod direction;
pub mod order_block;
pub mod pivot;
pub mod structure;
pub mod trade;

pub use bar::{Bar, PriceBar};
pub use direction::Direction;
pub use order_block::OrderBlock;
pub use pivot::{Pivot, PivotKind};
pub use structure::StructureBreak;
pub use trade::{ExitReason, Trade, TradeStage, PARTIAL_FRACTION, TARGET1_R, TARGET2_R};
