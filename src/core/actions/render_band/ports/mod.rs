pub mod colour_strategy;
pub mod output_device;
