pub mod colormap;
pub mod openpose_layout;
pub mod skeleton_visualizer;
