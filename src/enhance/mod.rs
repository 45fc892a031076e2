//! Strengthening arguments: the enhancement loop and the improvement planner

mod logic;
mod todo;

pub use logic::{
    EnhancementAction, EnhancementOutcome, InsertNode, LogicEnhancer, StrengthenEdge,
    ENHANCEMENT_ITERATIONS,
};
pub use todo::{ImprovementPlanner, ImprovementStep, ImprovementTodo, StrengthenNode};
