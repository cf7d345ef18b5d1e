// Smart Wall configurator engine.
//
// The modules under configurator/ split along one seam: catalog, dimensions,
// fitting, wall, and session are pure and synchronous, with no framework
// types; debounce and handlers are the async shell that drives them from
// HTTP. Keeping the engine pure is what makes the capacity and normalization
// rules unit-testable without a runtime.

pub mod catalog;
pub mod debounce;
pub mod dimensions;
pub mod fitting;
pub mod handlers;
pub mod session;
pub mod wall;
