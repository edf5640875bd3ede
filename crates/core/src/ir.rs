//! In-memory IR module for the compiler-plugin back end.
//!
//! The module owns its symbol table: renaming a definition rewrites every
//! use site in the same operation, so references can never dangle. This is
//! the property the driver relies on when it renames IR symbols directly
//! instead of going through the text rewriter.

use crate::symbol::{Linkage, SymbolInfo, SymbolKind};

/// A function in the module. Declarations have no body and are never renamed.
#[derive(Debug, Clone)]
pub struct IrFunction {
    pub name: String,
    pub linkage: Linkage,
    pub is_declaration: bool,
    /// Symbols referenced from the body: callees and globals.
    pub references: Vec<String>,
}

/// A global variable in the module.
#[derive(Debug, Clone)]
pub struct IrGlobal {
    pub name: String,
    pub linkage: Linkage,
    pub is_declaration: bool,
    pub size: u64,
    /// Symbols referenced from the initializer.
    pub references: Vec<String>,
}

/// An alias pointing at another symbol in the module.
#[derive(Debug, Clone)]
pub struct IrAlias {
    pub name: String,
    pub linkage: Linkage,
    pub aliasee: String,
}

/// One translation unit in IR form.
#[derive(Debug, Clone, Default)]
pub struct IrModule {
    pub name: String,
    pub source_file: String,
    functions: Vec<IrFunction>,
    globals: Vec<IrGlobal>,
    aliases: Vec<IrAlias>,
}

impl IrModule {
    pub fn new(name: impl Into<String>, source_file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_file: source_file.into(),
            ..Self::default()
        }
    }

    /// Adds a function definition with its body references.
    pub fn define_function(&mut self, name: &str, linkage: Linkage, references: &[&str]) {
        self.functions.push(IrFunction {
            name: name.to_string(),
            linkage,
            is_declaration: false,
            references: references.iter().map(|r| r.to_string()).collect(),
        });
    }

    /// Adds an external function declaration.
    pub fn declare_function(&mut self, name: &str) {
        self.functions.push(IrFunction {
            name: name.to_string(),
            linkage: Linkage::External,
            is_declaration: true,
            references: Vec::new(),
        });
    }

    /// Adds a global variable definition.
    pub fn define_global(&mut self, name: &str, linkage: Linkage, size: u64) {
        self.globals.push(IrGlobal {
            name: name.to_string(),
            linkage,
            is_declaration: false,
            size,
            references: Vec::new(),
        });
    }

    /// Adds an alias for an existing symbol.
    pub fn define_alias(&mut self, name: &str, aliasee: &str) {
        self.aliases.push(IrAlias {
            name: name.to_string(),
            linkage: Linkage::External,
            aliasee: aliasee.to_string(),
        });
    }

    pub fn functions(&self) -> &[IrFunction] {
        &self.functions
    }

    pub fn globals(&self) -> &[IrGlobal] {
        &self.globals
    }

    pub fn aliases(&self) -> &[IrAlias] {
        &self.aliases
    }

    /// Renames a symbol, updating the definition and every use site.
    pub fn rename(&mut self, old: &str, new: &str) {
        for function in &mut self.functions {
            if function.name == old {
                function.name = new.to_string();
            }
            for reference in &mut function.references {
                if reference == old {
                    *reference = new.to_string();
                }
            }
        }
        for global in &mut self.globals {
            if global.name == old {
                global.name = new.to_string();
            }
            for reference in &mut global.references {
                if reference == old {
                    *reference = new.to_string();
                }
            }
        }
        for alias in &mut self.aliases {
            if alias.name == old {
                alias.name = new.to_string();
            }
            if alias.aliasee == old {
                alias.aliasee = new.to_string();
            }
        }
    }

    /// Returns true if `name` resolves to a definition or declaration.
    pub fn resolves(&self, name: &str) -> bool {
        self.functions.iter().any(|f| f.name == name)
            || self.globals.iter().any(|g| g.name == name)
            || self.aliases.iter().any(|a| a.name == name)
    }

    /// Every use-site name in the module: body references and aliasees.
    pub fn referenced_names(&self) -> Vec<&str> {
        self.functions
            .iter()
            .flat_map(|f| f.references.iter())
            .chain(self.globals.iter().flat_map(|g| g.references.iter()))
            .map(String::as_str)
            .chain(self.aliases.iter().map(|a| a.aliasee.as_str()))
            .collect()
    }

    /// Descriptors for every defined symbol, in declaration order.
    /// External declarations are not eligible for renaming and are skipped.
    pub fn symbols(&self) -> Vec<SymbolInfo> {
        let mut symbols = Vec::new();
        for function in self.functions.iter().filter(|f| !f.is_declaration) {
            let mut info = SymbolInfo::new(&function.name, SymbolKind::Function, function.linkage);
            info.source_file = Some(self.source_file.clone());
            symbols.push(info);
        }
        for global in self.globals.iter().filter(|g| !g.is_declaration) {
            let kind = if global.linkage == Linkage::Internal {
                SymbolKind::StaticVar
            } else {
                SymbolKind::GlobalVar
            };
            let mut info = SymbolInfo::new(&global.name, kind, global.linkage);
            info.source_file = Some(self.source_file.clone());
            info.size = global.size;
            symbols.push(info);
        }
        for alias in &self.aliases {
            let mut info = SymbolInfo::new(&alias.name, SymbolKind::Alias, alias.linkage);
            info.source_file = Some(self.source_file.clone());
            symbols.push(info);
        }
        symbols
    }
}
