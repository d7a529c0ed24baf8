//! Crowd-sourced attraction intake and the merge pipeline that moves accepted
//! attractions and their photos into the authoritative store.

pub mod commands;
pub mod config;
pub mod error;
pub mod job_controller;
pub mod matching;
pub mod services;
pub mod store;
pub mod sync;
