pub mod allocation;
pub mod allocation_line;
pub mod sample_usage;
