pub mod config;
pub mod error;
pub mod events;
pub mod lister;
pub mod measure;
pub mod state;
pub mod web;
pub mod tasks {
    pub mod controller;
}
