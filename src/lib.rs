pub mod archive;
pub mod checksum;
pub mod download;
pub mod error;
pub mod http;
pub mod install;
pub mod link;
pub mod runtime;
pub mod tabulate;
pub mod toolchain;

/// Version reported by the binaries, derived from git at build time.
pub const VERSION: &str = env!("LMP_TOOLS_VERSION");

/// Fixtures shared by unit tests.
#[cfg(test)]
pub mod test_utils {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use md5::{Digest, Md5};
    use std::io::Write;

    /// Configure script that installs a header and an empty lib dir into `--prefix`.
    pub const FAKE_CONFIGURE: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    --prefix=*) prefix="${arg#--prefix=}" ;;
  esac
done
mkdir -p "$prefix/include" "$prefix/lib"
echo "/* fcs */" > "$prefix/include/fcs.h"
echo "configured with --prefix=$prefix"
"#;

    pub fn md5_hex(bytes: &[u8]) -> String {
        hex::encode(Md5::digest(bytes))
    }

    /// A gzip-compressed source tarball whose only top-level entry is `dir_name`.
    pub fn source_tarball(dir_name: &str) -> Vec<u8> {
        source_tarball_with(dir_name, FAKE_CONFIGURE)
    }

    /// Like [`source_tarball`], with a custom `configure` script.
    pub fn source_tarball_with(dir_name: &str, configure: &str) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        let files = [
            ("configure", configure, 0o755),
            ("README", "fake source tree\n", 0o644),
        ];
        for (name, content, mode) in files {
            let mut header = tar::Header::new_gnu();
            header.set_path(format!("{}/{}", dir_name, name)).unwrap();
            header.set_size(content.len() as u64);
            header.set_mode(mode);
            header.set_cksum();
            builder.append(&header, content.as_bytes()).unwrap();
        }
        let tar = builder.into_inner().unwrap();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&tar).unwrap();
        encoder.finish().unwrap()
    }
}
