use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use crate::{compile::Class, config::Config, error::Error, trace::Recorder};

/// Per-unit switches, shared read-only by every worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    pub strict: bool,
    pub tokens: bool,
    pub trace: bool,
}

/// Everything produced for one successfully compiled source file.
#[derive(Debug)]
pub struct Compiled {
    pub class: Class,
    /// `<tokens>` listing, when requested
    pub markup: Option<String>,
    pub trace: Option<Recorder>,
}

/// One source file and its compilation outcome.
#[derive(Debug)]
pub struct Unit {
    pub source: PathBuf,
    /// Source text; empty when the file could not be read
    pub code: String,
    pub result: Result<Compiled, Error>,
}

impl Unit {
    pub fn name(&self) -> String {
        self.source.display().to_string()
    }
}

/// A single file is taken as is. A directory is scanned one level deep for
/// files ending in `.ext`, sorted by name.
pub fn collect_sources(root: &Path, ext: &str) -> Result<Vec<PathBuf>, Error> {
    let name = root.display().to_string();
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut sources = vec![];
    for entry in fs::read_dir(root).map_err(|e| Error::DirRead(name.clone(), e))? {
        let path = entry.map_err(|e| Error::DirRead(name.clone(), e))?.path();
        if path.is_file() && path.extension().map_or(false, |e| e == ext) {
            sources.push(path);
        }
    }
    if sources.is_empty() {
        return Err(Error::NoSources(name, ext.to_string()));
    }
    sources.sort();
    Ok(sources)
}

pub fn compile_file(source: &Path, opts: Options) -> Unit {
    let name = source.display().to_string();
    let code = match fs::read_to_string(source) {
        Ok(code) => code,
        Err(e) => {
            return Unit {
                source: source.to_path_buf(),
                code: String::new(),
                result: Err(Error::FileRead(name, e)),
            }
        }
    };
    let result = compile_code(&code, opts);
    Unit {
        source: source.to_path_buf(),
        code,
        result,
    }
}

fn compile_code(code: &str, opts: Options) -> Result<Compiled, Error> {
    let tokens = crate::tokenize(code)?;
    let markup = opts.tokens.then(|| tokens.markup());
    let mut recorder = Recorder::new();
    let compiler = crate::Compiler::new(tokens).strict(opts.strict);
    let class = if opts.trace {
        compiler.hook(&mut recorder).compile()?
    } else {
        compiler.compile()?
    };
    Ok(Compiled {
        class,
        markup,
        trace: opts.trace.then_some(recorder),
    })
}

/// Compile every source on up to `jobs` worker threads. Units come back in
/// the order of `sources`, whatever order the workers finish in.
pub fn compile_all(sources: &[PathBuf], opts: Options, jobs: usize) -> Vec<Unit> {
    let jobs = jobs.clamp(1, sources.len().max(1));
    if jobs == 1 {
        return sources.iter().map(|s| compile_file(s, opts)).collect();
    }

    let chunk = (sources.len() + jobs - 1) / jobs;
    thread::scope(|scope| {
        let handles: Vec<_> = sources
            .chunks(chunk)
            .map(|part| scope.spawn(move || part.iter().map(|s| compile_file(s, opts)).collect::<Vec<_>>()))
            .collect();

        let mut units = Vec::with_capacity(sources.len());
        for handle in handles {
            match handle.join() {
                Ok(part) => units.extend(part),
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        units
    })
}

// ----------------------------------------------------------------------------
// Output
// ----------------------------------------------------------------------------

/// `Foo.jack` becomes `Foo.<ext>`, next to the source or inside `out_dir`.
pub fn output_path(source: &Path, out_dir: Option<&Path>, ext: &str) -> PathBuf {
    let path = match (out_dir, source.file_name()) {
        (Some(dir), Some(file)) => dir.join(file),
        _ => source.to_path_buf(),
    };
    path.with_extension(ext)
}

/// `<dir>/<dirname>.<ext>`, or the same file name inside `out_dir`.
pub fn combined_path(root: &Path, out_dir: Option<&Path>, ext: &str) -> PathBuf {
    let stem = root
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "out".to_string());
    out_dir
        .unwrap_or(root)
        .join(format!("{}.{}", stem, ext))
}

/// Token listing lands next to the unit's VM file as `<Name>T.xml`.
pub fn tokens_path(output: &Path, class: &str) -> PathBuf {
    output.with_file_name(format!("{}T.xml", class))
}

pub fn write_file(path: &Path, text: &str) -> Result<(), Error> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| Error::FileWrite(dir.display().to_string(), e))?;
    }
    fs::write(path, text).map_err(|e| Error::FileWrite(path.display().to_string(), e))
}

/// Every unit's instructions, in unit order, as one text.
pub fn combine<'a>(classes: impl IntoIterator<Item = &'a Class>) -> String {
    classes
        .into_iter()
        .map(|class| vmcode::writer::render(&class.insts))
        .collect()
}

/// Outcome of one output file.
#[derive(Debug)]
pub enum Output {
    Written(PathBuf),
    /// Combined file left out because some unit failed
    Skipped(PathBuf),
    /// File name and the error writing it
    Failed(String, Error),
}

/// Write every output of the run. With `combine` on a directory and every
/// unit compiled, the units share one file; otherwise each successful unit
/// gets its own VM file. Token listings are always per unit.
pub fn write_outputs(units: &[Unit], root: &Path, config: &Config) -> Vec<Output> {
    let out_dir = config.output.as_deref();
    let all_ok = units.iter().all(|u| u.result.is_ok());
    let mut outputs = vec![];

    let mut per_unit = true;
    if config.combine && root.is_dir() {
        let path = combined_path(root, out_dir, &config.output_ext);
        if all_ok {
            per_unit = false;
            let classes = units.iter().filter_map(|u| u.result.as_ref().ok()).map(|c| &c.class);
            outputs.push(match write_file(&path, &combine(classes)) {
                Ok(()) => Output::Written(path),
                Err(e) => Output::Failed(path.display().to_string(), e),
            });
        } else {
            outputs.push(Output::Skipped(path));
        }
    }

    for unit in units {
        let compiled = match &unit.result {
            Ok(compiled) => compiled,
            Err(_) => continue,
        };
        let out = output_path(&unit.source, out_dir, &config.output_ext);
        let mut files = vec![];
        if per_unit {
            files.push((out.clone(), vmcode::writer::render(&compiled.class.insts)));
        }
        if let Some(markup) = &compiled.markup {
            files.push((tokens_path(&out, &compiled.class.name), markup.clone()));
        }
        for (path, text) in files {
            outputs.push(match write_file(&path, &text) {
                Ok(()) => Output::Written(path),
                Err(e) => Output::Failed(unit.name(), e),
            });
        }
    }
    outputs
}
