pub mod app;
pub mod cli;
pub mod commands;
pub mod context;
pub mod entity;
pub mod error;
pub mod logging;
pub mod query;
pub mod rest;
pub mod storage;
