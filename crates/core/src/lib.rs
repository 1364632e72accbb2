pub mod shared {
    pub mod asset_resolver;
    pub mod constants;
    pub mod frame;
    pub mod listing;
}

pub mod imaging {
    pub mod domain {
        pub mod image_reader;
        pub mod image_viewer;
        pub mod image_writer;
    }
    pub mod infrastructure;
}

pub mod pose {
    pub mod domain {
        pub mod dataset_meta;
        pub mod pose_estimator;
        pub mod pose_result;
    }
    pub mod infrastructure;
}

pub mod visualization {
    pub mod domain {
        pub mod pose_visualizer;
        pub mod skeleton_style;
        pub mod visualizer_settings;
    }
    pub mod infrastructure;
}

pub mod sorting {
    pub mod domain {
        pub mod file_mover;
        pub mod frame_grouper;
        pub mod phase_planner;
        pub mod swing_phase;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod extract_poses_use_case;
    pub mod pipeline_logger;
    pub mod sort_swing_phases_use_case;
}
