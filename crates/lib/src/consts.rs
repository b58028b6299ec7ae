//! Fixed names and references baked into each release.

/// Container runtime used to run the kernel build.
pub const CONTAINER_RUNTIME: &str = "docker";

/// Versioned OpenCascade.js build image. Pinned per release for reproducible kernels.
pub const BUILD_IMAGE: &str = "donalffons/opencascade.js:2.0.0-beta.b5ff984";

/// Directory (relative to the project root) holding the kernel sources.
pub const KERNEL_DIR: &str = "build";

/// Build configuration file name, inside [`KERNEL_DIR`].
pub const CONFIG_FILENAME: &str = "opencascade.yaml";

/// Version marker file name, inside [`KERNEL_DIR`].
pub const VERSION_FILENAME: &str = "version";

/// Mount point of the project root inside the build container.
pub const CONTAINER_MOUNT: &str = "/src";
