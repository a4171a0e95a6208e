//! Note-board manipulation engine.
//!
//! This crate owns the interactive core of the board: translating raw
//! pointer, wheel, and key input into note drags, resizes, rotations, and
//! camera pan/zoom, while keeping a live preview separate from the committed
//! notes. It performs no I/O. The host forwards input to
//! [`engine::EngineCore`] and carries out the returned [`engine::Action`]s
//! (persisting records, saving the camera, showing notices, redrawing).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`] input routing and the host action contract |
//! | [`notes`] | Note collection: create, update, delete, z-order, selection |
//! | [`doc`] | Note, record, and partial-update types plus the in-memory store |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`gesture`] | Shared drag/resize/rotate exclusivity flags with scoped guards |
//! | [`drag`] | Note drag state machine |
//! | [`resize`] | Note resize state machine |
//! | [`rotate`] | Note rotate state machine |
//! | [`viewport`] | Camera pan, wheel zoom, and pinch state machine |
//! | [`input`] | Pointer, key, and wheel input types |
//! | [`hit`] | Hit-testing notes and their handles |
//! | [`consts`] | Shared numeric constants (zoom limits, default sizes, handle sizes) |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod drag;
pub mod engine;
pub mod gesture;
pub mod hit;
pub mod input;
pub mod notes;
pub mod resize;
pub mod rotate;
pub mod viewport;
