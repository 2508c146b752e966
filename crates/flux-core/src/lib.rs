pub mod constants;
pub mod debounce;
pub mod gesture;
pub mod hand;
pub mod landmarks;
pub mod params;
pub mod particles;
pub mod pipeline;
pub mod ribbons;
pub mod sim;
pub mod sparks;
pub mod targets;
pub mod world;

pub use debounce::Debouncer;
pub use gesture::{classify, classify_points, Gesture, HandReading};
pub use hand::{HandState, HandTracker, LeftAction};
pub use landmarks::{DetectedHand, HandLandmarks, Handedness, Landmark, LandmarkBatch, LandmarkError};
pub use params::{SimParams, TextConfig, TrackerParams, DEFAULT_TEXT_CONFIGS};
pub use particles::{Dirty, ParticleBuffers};
pub use pipeline::{HandPipeline, LandmarkSender};
pub use ribbons::RibbonSet;
pub use sim::{spring_step, BurstState, Mode, Simulation};
pub use sparks::SparkField;
pub use targets::{FallbackRasterizer, GlyphBitmap, GlyphCache, GlyphPool, GlyphRasterizer, TargetSet};
pub use world::{Camera, World, WorldMapper};
