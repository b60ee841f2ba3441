//! Preset names generated by the Conan CMake toolchain.

use crate::Platform;

/// Configure preset on single-config generators.
pub const CONAN_RELEASE: &str = "conan-release";

/// Configure preset on multi-config generators (Visual Studio).
pub const CONAN_DEFAULT: &str = "conan-default";

/// Configure preset Conan generates for `platform`.
pub fn conan_configure_preset(platform: Platform) -> &'static str {
    match platform {
        Platform::Windows => CONAN_DEFAULT,
        _ => CONAN_RELEASE,
    }
}

/// Build preset Conan generates; identical on every platform.
pub fn conan_build_preset(_platform: Platform) -> &'static str {
    CONAN_RELEASE
}
