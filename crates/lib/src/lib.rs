//! slsprisma-lib: packaging hook for Prisma clients in serverless bundles
//!
//! After the webpack step has packed external modules into one build
//! directory per function, this crate makes each directory self-contained:
//! - `select`: which build directories to process
//! - `deps`: temporary `prisma` dev dependency
//! - `schema`: copy or symlink the schema directory
//! - `generate`: `npx prisma generate`
//! - `prune`: delete engine binaries the deployment target does not need
//! - `pack`: the coordinator tying the steps together

pub mod config;
pub mod consts;
pub mod deps;
pub mod exec;
pub mod generate;
pub mod pack;
pub mod prune;
pub mod schema;
pub mod select;
pub mod service;
pub mod util;

pub use config::{Config, PackageManager, SchemaMode};
pub use exec::{CommandRunner, CommandSpec, ExecError, SystemRunner};
pub use pack::{PackError, PackPlan, PackReport, execute, plan, run};
pub use service::ServiceManifest;
