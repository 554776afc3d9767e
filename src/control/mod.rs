//! Character locomotion against collision models.

pub use self::slide_move::{clip_to_plane, slide_move, slide_move_with_config, SlideMoveConfig};

mod slide_move;
