mod public;

pub use public::{WidgetState, build_router};
