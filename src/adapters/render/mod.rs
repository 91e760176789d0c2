pub mod palette;
pub mod plotter;
