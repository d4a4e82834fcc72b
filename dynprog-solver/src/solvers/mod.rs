//! Solver implementations

mod frontier;
mod row_fill;
mod row_split;


pub use frontier::{
    BlockCheckSleep, BlockCheckWait, CellCheck, CellCheckWait, ColumnBands, ColumnBlock,
    FillContext, FillStrategy, Frontier, SleepPerBlock, SpinPerCell, WaitPerBlock, WaitPerCell,
};
pub use row_fill::RowFill;
pub use row_split::RowSplit;
