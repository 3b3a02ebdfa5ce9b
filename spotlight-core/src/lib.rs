pub mod error;

pub mod config;

pub mod logging;
pub use logging::Logger;

pub mod backend;

pub mod util {
    pub mod debounce;
    pub use debounce::{DebounceConfig, Debouncer};
}

pub mod controller {

    pub mod actions;
    pub use actions::Action;

    pub mod activation;
    pub use activation::{ChannelActivator, RecordActivator};

    pub mod event_loop;
    pub use event_loop::SpotlightApp;

    pub mod handler_registry;

    pub mod handlers;

    pub mod search_controller;
    pub use search_controller::{SearchController, SearchEvent};
}

pub mod model {
    pub mod flatten;

    pub mod search_state;
    pub use search_state::{RecordRef, ResultGroup, ResultRecord, SearchState};
}

pub mod view {
    pub mod hit_map;

    pub mod icons;

    pub mod theme;

    pub mod ui;

    pub mod components {
        pub mod search_overlay;
        pub use search_overlay::{OverlayScroll, SearchOverlay};
        pub mod toolbar;
        pub use toolbar::Toolbar;
    }
}
