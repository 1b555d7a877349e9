//! The wasmi-backed host: instantiates a compiled module and runs its
//! exported entry.

use thiserror::Error;
use wasmi::{Caller, Engine, Linker, Memory, MemoryType, Module, Store, TypedFunc};

use crate::{compile, CompileError};
use metsu_codegen::{ENTRY_EXPORT, IMPORT_MODULE, MEMORY_IMPORT, PRINT_IMPORT};

/// Host facilities a compiled module imports.
pub struct Imports {
    /// Receives every printed value. Integers arrive converted to f32.
    pub print: Box<dyn FnMut(f32) + Send>,
}

impl Imports {
    pub fn new(print: impl FnMut(f32) + Send + 'static) -> Self {
        Self {
            print: Box::new(print),
        }
    }
}

/// A failure compiling, instantiating, or executing a program.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error("instantiation failed: {0}")]
    Instantiation(String),
    #[error("execution trapped: {0}")]
    Execution(String),
}

struct HostState {
    print: Box<dyn FnMut(f32) + Send>,
}

/// A ready-to-run instance. [`Runner::invoke`] consumes it, so the entry
/// executes exactly once per compilation.
pub struct Runner {
    store: Store<HostState>,
    entry: TypedFunc<(), ()>,
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner").finish_non_exhaustive()
    }
}

impl Runner {
    /// Execute the module's exported entry.
    pub fn invoke(mut self) -> Result<(), RunError> {
        self.entry
            .call(&mut self.store, ())
            .map_err(|e| RunError::Execution(e.to_string()))
    }
}

/// Compile `source` and stand up a `wasmi` instance around it: the
/// supplied `print` callback and one page of linear memory are wired in as
/// the module's imports, and the `run` export is resolved.
pub fn run(source: &str, imports: Imports) -> Result<Runner, RunError> {
    let wasm = compile(source)?;

    let engine = Engine::default();
    let module = Module::new(&engine, &wasm[..])
        .map_err(|e| RunError::Instantiation(e.to_string()))?;
    let mut store = Store::new(&engine, HostState {
        print: imports.print,
    });

    let mut linker = Linker::<HostState>::new(&engine);
    linker
        .func_wrap(
            IMPORT_MODULE,
            PRINT_IMPORT,
            |mut caller: Caller<'_, HostState>, value: f32| {
                (caller.data_mut().print)(value);
            },
        )
        .map_err(|e| RunError::Instantiation(e.to_string()))?;

    let memory_type =
        MemoryType::new(1, None).map_err(|e| RunError::Instantiation(e.to_string()))?;
    let memory = Memory::new(&mut store, memory_type)
        .map_err(|e| RunError::Instantiation(e.to_string()))?;
    linker
        .define(IMPORT_MODULE, MEMORY_IMPORT, memory)
        .map_err(|e| RunError::Instantiation(e.to_string()))?;

    let instance = linker
        .instantiate(&mut store, &module)
        .map_err(|e| RunError::Instantiation(e.to_string()))?
        .start(&mut store)
        .map_err(|e| RunError::Instantiation(e.to_string()))?;
    let entry = instance
        .get_typed_func::<(), ()>(&store, ENTRY_EXPORT)
        .map_err(|e| RunError::Instantiation(e.to_string()))?;

    Ok(Runner { store, entry })
}
