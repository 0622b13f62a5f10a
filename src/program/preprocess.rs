//! Shader source assembly: a `#version`/`#define` prelude plus `#include` resolution.
//!
//! Includes are only honored at the top of a file, before any other non-blank line. Each
//! file is emitted once per shader, as its own fragment, ahead of every file that includes
//! it, and the directive line itself is left blank so that line numbers in compiler logs
//! still match the file on disk.

use std::{
    io,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashSet;

use super::{GlslVersion, MacroDefinition};

/// File access used while resolving includes.
pub trait ShaderFilesystem {
    fn exists(&self, path: &Path) -> bool;
    /// An absolute, normalized path identifying the file at `path`.
    fn canonical(&self, path: &Path) -> io::Result<PathBuf>;
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFilesystem;

impl ShaderFilesystem for StdFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
    fn canonical(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PreprocessError {
    #[error("{}:{line}: cyclical include of {}", .file.display(), .include.display())]
    Cycle {
        file: PathBuf,
        line: usize,
        include: PathBuf,
    },
    #[error("failed to open shader source {}", .file.display())]
    Open {
        file: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}:{line}: include {} not found", .file.display(), .include.display())]
    IncludeNotFound {
        file: PathBuf,
        line: usize,
        include: PathBuf,
    },
    #[error("{}:{line}: invalid #include directive: {directive:?}", .file.display())]
    InvalidInclude {
        file: PathBuf,
        line: usize,
        directive: String,
    },
    #[error("{}:{line}: #include after non-empty line", .file.display())]
    IncludeAfterCode { file: PathBuf, line: usize },
}

/// `#version <n> <profile>` followed by a `#define` for every definition.
#[must_use]
pub fn prelude(version: GlslVersion, definitions: &[MacroDefinition]) -> String {
    let mut prelude = format!("#version {version}\n");
    for MacroDefinition { name, value } in definitions {
        prelude.push_str(&format!("#define {name} {value}\n"));
    }
    prelude
}

/// Where an include was reached from, for error reporting.
struct Origin<'a> {
    file: &'a Path,
    line: usize,
}

struct Resolver<'a, Fs: ShaderFilesystem + ?Sized> {
    include_dirs: &'a [PathBuf],
    fs: &'a Fs,
    fragments: Vec<String>,
    open: FxHashSet<PathBuf>,
    resolved: FxHashSet<PathBuf>,
}

impl<Fs: ShaderFilesystem + ?Sized> Resolver<'_, Fs> {
    fn find_include(&self, include: &Path) -> Option<PathBuf> {
        if self.fs.exists(include) {
            return Some(include.to_owned());
        }
        self.include_dirs
            .iter()
            .map(|dir| dir.join(include))
            .find(|path| self.fs.exists(path))
    }

    fn resolve(&mut self, file: &Path, origin: Option<Origin<'_>>) -> Result<(), PreprocessError> {
        let canonical = self
            .fs
            .canonical(file)
            .map_err(|source| PreprocessError::Open {
                file: file.to_owned(),
                source,
            })?;
        if self.resolved.contains(&canonical) {
            return Ok(());
        }
        if self.open.contains(&canonical) {
            // The first source can never be reopened, so there is always an origin here.
            let (from, line) = origin.map_or((file, 0), |o| (o.file, o.line));
            return Err(PreprocessError::Cycle {
                file: from.to_owned(),
                line,
                include: file.to_owned(),
            });
        }
        self.open.insert(canonical.clone());

        let text = self
            .fs
            .read_to_string(file)
            .map_err(|source| PreprocessError::Open {
                file: file.to_owned(),
                source,
            })?;

        let mut fragment = String::with_capacity(text.len());
        let mut past_prologue = false;
        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let mut tokens = line.split_whitespace();
            let kept = match tokens.next() {
                Some("#include") => {
                    if past_prologue {
                        return Err(PreprocessError::IncludeAfterCode {
                            file: file.to_owned(),
                            line: line_no,
                        });
                    }
                    let include = tokens
                        .next()
                        .and_then(|token| token.strip_prefix('"')?.strip_suffix('"'))
                        .filter(|path| !path.is_empty())
                        .ok_or_else(|| PreprocessError::InvalidInclude {
                            file: file.to_owned(),
                            line: line_no,
                            directive: line.to_owned(),
                        })?;
                    let include = Path::new(include);
                    let found = self.find_include(include).ok_or_else(|| {
                        PreprocessError::IncludeNotFound {
                            file: file.to_owned(),
                            line: line_no,
                            include: include.to_owned(),
                        }
                    })?;
                    log::trace!("{}:{line_no}: including {}", file.display(), found.display());
                    self.resolve(
                        &found,
                        Some(Origin {
                            file,
                            line: line_no,
                        }),
                    )?;
                    ""
                }
                Some(_) => {
                    past_prologue = true;
                    line
                }
                None => line,
            };
            fragment.push_str(kept);
            fragment.push('\n');
        }

        self.fragments.push(fragment);
        self.open.remove(&canonical);
        self.resolved.insert(canonical);
        Ok(())
    }
}

/// Assemble the fragments of one shader: the [`prelude`], then every source with its
/// includes resolved, dependencies first.
pub fn resolve_source_fragments<Fs: ShaderFilesystem + ?Sized>(
    version: GlslVersion,
    sources: &[impl AsRef<Path>],
    include_dirs: &[PathBuf],
    definitions: &[MacroDefinition],
    fs: &Fs,
) -> Result<Vec<String>, PreprocessError> {
    let mut resolver = Resolver {
        include_dirs,
        fs,
        fragments: vec![prelude(version, definitions)],
        open: FxHashSet::default(),
        resolved: FxHashSet::default(),
    };
    for source in sources {
        resolver.resolve(source.as_ref(), None)?;
    }
    Ok(resolver.fragments)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::program::{GlslProfile, GlslVersionNumber};

    /// Files keyed by absolute path. Relative lookups are rooted at `/`.
    #[derive(Default)]
    struct MemoryFs(HashMap<PathBuf, String>);

    impl MemoryFs {
        fn with(files: &[(&str, &str)]) -> Self {
            Self(
                files
                    .iter()
                    .map(|(path, text)| (PathBuf::from(path), (*text).to_owned()))
                    .collect(),
            )
        }
        fn absolute(path: &Path) -> PathBuf {
            Path::new("/").join(path)
        }
    }

    impl ShaderFilesystem for MemoryFs {
        fn exists(&self, path: &Path) -> bool {
            self.0.contains_key(&Self::absolute(path))
        }
        fn canonical(&self, path: &Path) -> io::Result<PathBuf> {
            Ok(Self::absolute(path))
        }
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.0
                .get(&Self::absolute(path))
                .cloned()
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }
    }

    fn resolve(
        fs: &MemoryFs,
        sources: &[&str],
        dirs: &[&str],
    ) -> Result<Vec<String>, PreprocessError> {
        let dirs: Vec<PathBuf> = dirs.iter().map(PathBuf::from).collect();
        resolve_source_fragments(GlslVersion::default(), sources, &dirs, &[], fs)
    }

    #[test]
    fn prelude_carries_version_and_definitions() {
        let version = GlslVersion {
            number: GlslVersionNumber::V330,
            profile: GlslProfile::Compatibility,
        };
        let definitions = [
            MacroDefinition::new("LIGHTS", "4"),
            MacroDefinition::new("USE_FOG", "1"),
        ];
        assert_eq!(
            prelude(version, &definitions),
            "#version 330 compatibility\n#define LIGHTS 4\n#define USE_FOG 1\n"
        );
        assert_eq!(prelude(GlslVersion::default(), &[]), "#version 430 core\n");
    }

    #[test]
    fn plain_source_is_one_fragment() {
        let fs = MemoryFs::with(&[("/main.glsl", "void main() {}")]);
        let fragments = resolve(&fs, &["/main.glsl"], &[]).unwrap();
        assert_eq!(fragments, ["#version 430 core\n", "void main() {}\n"]);
    }

    #[test]
    fn includes_come_first_and_leave_a_blank_line() {
        let fs = MemoryFs::with(&[
            ("/lib/common.glsl", "float two() { return 2.0; }"),
            ("/main.glsl", "\n#include \"common.glsl\"\nvoid main() {}"),
        ]);
        let fragments = resolve(&fs, &["/main.glsl"], &["/lib"]).unwrap();
        assert_eq!(
            fragments[1..],
            [
                "float two() { return 2.0; }\n",
                "\n\nvoid main() {}\n",
            ]
        );
    }

    #[test]
    fn include_as_given_wins_over_directories() {
        let fs = MemoryFs::with(&[
            ("/a.glsl", "// root"),
            ("/lib/a.glsl", "// lib"),
            ("/main.glsl", "#include \"a.glsl\""),
        ]);
        let fragments = resolve(&fs, &["/main.glsl"], &["/lib"]).unwrap();
        assert_eq!(fragments[1], "// root\n");
    }

    #[test]
    fn directories_are_searched_in_order() {
        let fs = MemoryFs::with(&[
            ("/first/a.glsl", "// first"),
            ("/second/a.glsl", "// second"),
            ("/main.glsl", "#include \"a.glsl\""),
        ]);
        let fragments = resolve(&fs, &["/main.glsl"], &["/second", "/first"]).unwrap();
        assert_eq!(fragments[1], "// second\n");
    }

    #[test]
    fn shared_includes_are_emitted_once() {
        let fs = MemoryFs::with(&[
            ("/base.glsl", "// base"),
            ("/left.glsl", "#include \"base.glsl\"\n// left"),
            ("/right.glsl", "#include \"base.glsl\"\n// right"),
            (
                "/main.glsl",
                "#include \"left.glsl\"\n#include \"right.glsl\"\n// main",
            ),
        ]);
        let fragments = resolve(&fs, &["/main.glsl"], &[]).unwrap();
        assert_eq!(
            fragments[1..],
            [
                "// base\n",
                "\n// left\n",
                "\n// right\n",
                "\n\n// main\n"
            ]
        );
    }

    #[test]
    fn repeated_sources_are_emitted_once() {
        let fs = MemoryFs::with(&[("/main.glsl", "// main")]);
        let fragments = resolve(&fs, &["/main.glsl", "main.glsl"], &[]).unwrap();
        assert_eq!(fragments.len(), 2);
    }

    #[test]
    fn cycles_are_reported_at_the_include() {
        let fs = MemoryFs::with(&[
            ("/a.glsl", "#include \"b.glsl\""),
            ("/b.glsl", "\n#include \"a.glsl\""),
        ]);
        let err = resolve(&fs, &["/a.glsl"], &[]).unwrap_err();
        match err {
            PreprocessError::Cycle {
                file,
                line,
                include,
            } => {
                assert_eq!(file, Path::new("b.glsl"));
                assert_eq!(line, 2);
                assert_eq!(include, Path::new("a.glsl"));
            }
            other => panic!("expected a cycle, got {other:?}"),
        }
    }

    #[test]
    fn include_after_code_is_rejected() {
        let fs = MemoryFs::with(&[
            ("/a.glsl", "// a"),
            ("/main.glsl", "void main() {}\n#include \"a.glsl\""),
        ]);
        assert!(matches!(
            resolve(&fs, &["/main.glsl"], &[]),
            Err(PreprocessError::IncludeAfterCode { line: 2, .. })
        ));
    }

    #[test]
    fn indented_includes_are_still_includes() {
        let fs = MemoryFs::with(&[
            ("/a.glsl", "// a"),
            ("/main.glsl", "   #include   \"a.glsl\"  \n// main"),
        ]);
        let fragments = resolve(&fs, &["/main.glsl"], &[]).unwrap();
        assert_eq!(fragments[1..], ["// a\n", "\n// main\n"]);
    }

    #[test]
    fn malformed_includes_are_rejected() {
        for directive in ["#include", "#include <a.glsl>", "#include \"\"", "#include \"a.glsl"] {
            let fs = MemoryFs::with(&[("/a.glsl", ""), ("/main.glsl", directive)]);
            match resolve(&fs, &["/main.glsl"], &[]) {
                Err(PreprocessError::InvalidInclude {
                    line, directive: d, ..
                }) => {
                    assert_eq!(line, 1);
                    assert_eq!(d, directive);
                }
                other => panic!("{directive:?} gave {other:?}"),
            }
        }
    }

    #[test]
    fn missing_includes_are_reported() {
        let fs = MemoryFs::with(&[("/main.glsl", "\n\n#include \"nowhere.glsl\"")]);
        assert!(matches!(
            resolve(&fs, &["/main.glsl"], &["/lib"]),
            Err(PreprocessError::IncludeNotFound { line: 3, .. })
        ));
    }

    #[test]
    fn missing_sources_fail_to_open() {
        let fs = MemoryFs::default();
        let err = resolve(&fs, &["/main.glsl"], &[]).unwrap_err();
        assert!(matches!(err, PreprocessError::Open { .. }));
        assert!(err.to_string().contains("main.glsl"));
    }
}
