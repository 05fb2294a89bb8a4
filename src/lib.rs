//! # Pancake Shop
//!
//! A staged order-fulfillment pipeline: orders are created and stocked with
//! pancakes, completed into a preparation queue, prepared into a delivery
//! queue, and finally delivered — with independent worker tasks advancing
//! orders through the stages concurrently.
//!
//! ## Module Tour
//!
//! - **[`model`]** — pure data types: the [`Order`](model::Order) aggregate
//!   (identity-keyed), the [`Recipe`](model::Recipe) value object
//!   (structurally equal), the memoizing [`RecipeBook`](model::RecipeBook)
//!   and the [`AddressValidator`](model::AddressValidator) rule chain.
//! - **[`store`]** — the concurrent order store. Per-entry locking: mutating
//!   two different orders never contends on a store-wide lock.
//! - **[`stage`]** — the generic [`StageQueue`](stage::StageQueue): unbounded
//!   FIFO hand-off with timed pops. An idle pipeline is `None`, not an error.
//! - **[`service`]** — the [`ManagementService`](service::ManagementService)
//!   orchestrator, its error taxonomy and the transition-record sink.
//! - **[`runtime`]** — wiring: [`PancakeShop`](runtime::PancakeShop),
//!   configuration and tracing setup.
//! - **[`workers`]** — customer / cook / courier loops driving the pipeline.
//!
//! ## Concurrency Model
//!
//! Workers call the service with no coordination among themselves. Per-order
//! mutations are atomic (per-entry mutex in the store); stage hand-offs are
//! exactly-once FIFO (tokio mpsc); only `prepare_order` and `deliver_order`
//! block, bounded by the configured stage timeout. Transition records flow
//! through a single-writer channel so log output never interleaves
//! mid-record without serializing unrelated orders.
//!
//! ## Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod model;
pub mod runtime;
pub mod service;
pub mod stage;
pub mod store;
pub mod workers;
