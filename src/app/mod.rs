// Application layer: the CLI front end that drives the history manager.

pub mod commands;
