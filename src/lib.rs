//! # Overview
//! "Precinct_sim" simulates voter wait times at election precincts, to help
//! planners size the number of voting stations at each precinct.
//!
//! This repository contains:
//!
//! * Configuration loading, from YAML, JSON, or the legacy plain-text
//! parameter and service-time files.
//! * Input modeling, for seeded random draws, empirical service times, and
//! hourly exponential arrivals.
//! * Voter and precinct models, and the voter population generator.
//! * Simulator engine, replaying a day of arrivals against a pool of
//! stations and sweeping station counts until no voter waits too long.
//! * Output analysis, for wait-time statistics and histograms.
pub mod config;
pub mod input_modeling;
pub mod models;
pub mod output_analysis;
pub mod simulator;
pub mod utils;
