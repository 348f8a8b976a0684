mod chart;
mod cli;
mod common;
