// Adapters layer: concrete implementations of the domain ports.

pub mod cloud_controller;

pub use cloud_controller::CloudControllerClient;
