/// Fixed tables shared by the plan compiler and the map exporter
pub mod material;
pub mod occupancy;
pub mod scene;
