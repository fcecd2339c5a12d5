pub mod pfield_vis2d;
pub mod headless;
