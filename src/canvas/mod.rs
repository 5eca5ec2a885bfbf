//! Canvas domain: storage, sharing, and the canvas API
//!
//! A canvas is a named drawing document owned by one user and optionally
//! shared with others as collaborators (read/write) or viewers (read only).
//! The drawing data itself is an opaque JSON object supplied by the
//! frontend editor; the server stores and serves it verbatim.
//!
//! # Architecture
//!
//! ```text
//! canvas/
//! ├── access.rs    - role resolution (owner / collaborator / viewer)
//! ├── db.rs        - queries against canvases and canvas_members
//! ├── types.rs     - request/response bodies and validation
//! └── handlers.rs  - the /api/canvas endpoints
//! ```

pub mod access;
pub mod db;
pub mod handlers;
pub mod types;

pub use access::CanvasRole;
pub use handlers::{
    create_canvas, delete_canvas, get_canvas_data, list_canvases, update_canvas_data,
    update_canvas_details,
};
