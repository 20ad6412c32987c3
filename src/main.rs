use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    thread,
    time::Duration,
};

use anyhow::{Context, anyhow};
use clap::Parser;
use indexmap::IndexMap;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};
use wdte::{
    error::ImportError,
    eval_fragment,
    interpreter::{
        import::{Importer, Registry},
        value::{
            frame::{Frame, Signal},
            func::Func,
            module::Module,
        },
    },
    load, prelude,
};

/// Stack size of the evaluation thread. Deeply recursive scripts need more
/// than the default.
const STACK_SIZE: usize = 256 * 1024 * 1024;

/// wdte is a small, embeddable functional scripting language. Every value is
/// a function, and programs are written as chains of calls.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells wdte to look at a file instead of a script.
    #[arg(short, long)]
    file: bool,

    /// Evaluates the input as a fragment of bare expressions instead of a
    /// script of declarations.
    #[arg(long)]
    fragment: bool,

    /// The function to run after loading a script.
    #[arg(short, long, default_value = "main")]
    entry: String,

    /// Aborts evaluation after this many milliseconds.
    #[arg(short, long)]
    timeout: Option<u64>,

    /// The maximum number of nested function calls.
    #[arg(long)]
    max_depth: Option<usize>,

    /// A directory to load imports from: `'name' => m;` reads
    /// `<lib>/name.wdte`.
    #[arg(short, long)]
    lib: Option<PathBuf>,

    contents: String,
}

/// Resolves imports by loading `<root>/<path>.wdte`.
///
/// Every module is loaded at most once. Imports already being loaded further
/// up the chain are rejected as cycles.
struct FileImporter {
    root:    PathBuf,
    loaded:  RefCell<IndexMap<String, Arc<Module>>>,
    loading: RefCell<Vec<String>>,
}

impl FileImporter {
    fn new(root: &Path) -> Self {
        Self { root:    root.to_path_buf(),
               loaded:  RefCell::default(),
               loading: RefCell::default(), }
    }
}

impl Importer for FileImporter {
    fn import(&self, path: &str) -> Result<Arc<Module>, ImportError> {
        if let Some(module) = self.loaded.borrow().get(path) {
            return Ok(module.clone());
        }
        if self.loading.borrow().iter().any(|p| p == path) {
            return Err(ImportError::Cycle { path: path.to_string() });
        }

        let file = self.root.join(format!("{path}.wdte"));
        debug!(file = %file.display(), "loading module");
        let source = fs::read_to_string(&file).map_err(|source| ImportError::Io { path: file.clone(),
                                                                                    source })?;

        self.loading.borrow_mut().push(path.to_string());
        let result = load(&source, self);
        self.loading.borrow_mut().pop();

        let module = result.map_err(|source| ImportError::Load { path:   path.to_string(),
                                                                  source: Box::new(source), })?;
        self.loaded.borrow_mut().insert(path.to_string(), module.clone());
        Ok(module)
    }
}

/// Initializes logging to standard error.
///
/// Use the `RUST_LOG` environment variable to override the default filter.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt().with_env_filter(filter)
         .with_target(false)
         .with_writer(std::io::stderr)
         .init();
}

fn run(args: &Args, source: &str, signal: Signal) -> anyhow::Result<Func> {
    let mut frame = Frame::new(prelude()).with_signal(signal);
    if let Some(max_depth) = args.max_depth {
        frame = frame.with_max_depth(max_depth);
    }

    let result = if args.fragment {
        eval_fragment(source, &frame)?
    } else {
        let module = match &args.lib {
            Some(dir) => load(source, &FileImporter::new(dir))?,
            None => load(source, &Registry::new())?,
        };
        module.call(&frame, &args.entry, &[])
    };

    Ok(result.into_result()?)
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let source = if args.file {
        fs::read_to_string(&args.contents).with_context(|| {
                                              format!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                                                      &args.contents)
                                          })?
    } else {
        args.contents.clone()
    };

    let mut signal = Signal::new();
    if let Some(ms) = args.timeout {
        signal = signal.with_timeout(Duration::from_millis(ms));
    }

    let worker = thread::Builder::new().name("wdte-eval".into())
                                       .stack_size(STACK_SIZE)
                                       .spawn(move || run(&args, &source, signal))?;
    let result = worker.join().map_err(|_| anyhow!("evaluation thread panicked"))??;

    println!("{result}");
    Ok(())
}
