pub const APP_NAME: &str = "slsprisma";

/// Host lifecycle event the `pack` entry point is bound to.
pub const HOOK_EVENT: &str = "after:webpack:package:packExternalModules";

/// npm package name of the client generator.
pub const GENERATOR_PACKAGE: &str = "prisma";

/// Directory under the output root holding one build directory per unit.
pub const BUILD_ROOT_DIR: &str = ".webpack";

/// Unit name used when the service is packaged as a single bundle.
pub const SERVICE_UNIT: &str = "service";

/// Runtime assumed when neither the function nor the provider sets one.
pub const DEFAULT_RUNTIME: &str = "nodejs";

/// Substring identifying a JavaScript runtime.
pub const NODE_RUNTIME_MARKER: &str = "node";

/// Directory name the generator reads its schema from.
pub const DEFAULT_SCHEMA_DIR: &str = "prisma";

/// Flag appended to the generate command in remote-proxy mode.
pub const DATA_PROXY_FLAG: &str = "--data-proxy";

/// Default service manifest file name.
pub const MANIFEST_FILENAME: &str = "serverless.yml";
