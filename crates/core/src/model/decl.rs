//! Declaration trees handed to the module by the parser.
//!
//! These are plain owned values. The module turns them into arena entities
//! in `Module::add_or_replace_file`.

use super::line_map::LineMap;
use semascope_api::models::{EntityKind, TextRange, TypeReference};
use smol_str::SmolStr;

/// An `import` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Dotted path without the trailing `*`.
    pub path: Vec<SmolStr>,
    pub is_static: bool,
    /// `import a.b.*;`
    pub on_demand: bool,
}

impl Import {
    fn parse(dotted: &str, is_static: bool, on_demand: bool) -> Self {
        Self {
            path: dotted
                .split('.')
                .filter(|s| !s.is_empty() && *s != "*")
                .map(SmolStr::new)
                .collect(),
            is_static,
            on_demand,
        }
    }

    /// `import java.util.List;`
    pub fn single(dotted: &str) -> Self {
        Self::parse(dotted, false, false)
    }

    /// `import java.util.*;`
    pub fn on_demand(dotted: &str) -> Self {
        Self::parse(dotted, false, true)
    }

    /// `import static java.lang.Math.max;`
    pub fn static_single(dotted: &str) -> Self {
        Self::parse(dotted, true, false)
    }

    /// `import static java.lang.Math.*;`
    pub fn static_on_demand(dotted: &str) -> Self {
        Self::parse(dotted, true, true)
    }

    /// Last segment, the name a single import makes visible.
    pub fn simple_name(&self) -> Option<&SmolStr> {
        self.path.last()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: SmolStr,
    pub bounds: Vec<TypeReference>,
}

impl TypeParameter {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn bounded(name: impl Into<SmolStr>, bounds: Vec<TypeReference>) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VariableDecl {
    pub name: SmolStr,
    pub type_ref: TypeReference,
    pub is_static: bool,
    pub range: TextRange,
}

impl VariableDecl {
    pub fn new(name: impl Into<SmolStr>, type_ref: TypeReference) -> Self {
        Self {
            name: name.into(),
            type_ref,
            is_static: false,
            range: TextRange::default(),
        }
    }

    pub fn at(mut self, start: u32, end: u32) -> Self {
        self.range = TextRange::new(start, end);
        self
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: SmolStr,
    pub is_static: bool,
    pub range: TextRange,
    /// `None` for constructors.
    pub return_type: Option<TypeReference>,
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<VariableDecl>,
    /// Local variables declared anywhere in the body.
    pub locals: Vec<VariableDecl>,
    pub is_varargs: bool,
}

impl MethodDecl {
    /// A constructor; call `returns` to make it an ordinary method.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            is_static: false,
            range: TextRange::default(),
            return_type: None,
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            locals: Vec::new(),
            is_varargs: false,
        }
    }

    pub fn returns(mut self, type_ref: TypeReference) -> Self {
        self.return_type = Some(type_ref);
        self
    }

    pub fn param(mut self, name: impl Into<SmolStr>, type_ref: TypeReference) -> Self {
        self.parameters.push(VariableDecl::new(name, type_ref));
        self
    }

    /// Trailing `T... name` parameter. `element` is `T`; the parameter is
    /// declared with the array type.
    pub fn varargs(mut self, name: impl Into<SmolStr>, element: TypeReference) -> Self {
        self.parameters.push(VariableDecl::new(name, element.array()));
        self.is_varargs = true;
        self
    }

    pub fn local(mut self, local: VariableDecl) -> Self {
        self.locals.push(local);
        self
    }

    pub fn type_param(mut self, param: TypeParameter) -> Self {
        self.type_parameters.push(param);
        self
    }

    pub fn at(mut self, start: u32, end: u32) -> Self {
        self.range = TextRange::new(start, end);
        self
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

#[derive(Debug, Clone)]
pub enum MemberDecl {
    Field(VariableDecl),
    Method(MethodDecl),
    Class(ClassDecl),
}

/// A class, interface, enum or annotation declaration.
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: SmolStr,
    pub kind: EntityKind,
    pub is_static: bool,
    pub range: TextRange,
    pub superclass: Option<TypeReference>,
    pub interfaces: Vec<TypeReference>,
    pub type_parameters: Vec<TypeParameter>,
    pub members: Vec<MemberDecl>,
}

impl ClassDecl {
    pub fn new(name: impl Into<SmolStr>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_static: false,
            range: TextRange::default(),
            superclass: None,
            interfaces: Vec::new(),
            type_parameters: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn class(name: impl Into<SmolStr>) -> Self {
        Self::new(name, EntityKind::Class)
    }

    pub fn interface(name: impl Into<SmolStr>) -> Self {
        Self::new(name, EntityKind::Interface)
    }

    pub fn extends(mut self, superclass: TypeReference) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub fn implements(mut self, interface: TypeReference) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn type_param(mut self, param: TypeParameter) -> Self {
        self.type_parameters.push(param);
        self
    }

    pub fn field(mut self, field: VariableDecl) -> Self {
        self.members.push(MemberDecl::Field(field));
        self
    }

    pub fn method(mut self, method: MethodDecl) -> Self {
        self.members.push(MemberDecl::Method(method));
        self
    }

    pub fn nested(mut self, class: ClassDecl) -> Self {
        self.members.push(MemberDecl::Class(class));
        self
    }

    pub fn at(mut self, start: u32, end: u32) -> Self {
        self.range = TextRange::new(start, end);
        self
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// One parsed source unit.
#[derive(Debug, Clone)]
pub struct FileDecl {
    pub path: String,
    pub package: Vec<SmolStr>,
    pub imports: Vec<Import>,
    pub range: TextRange,
    pub line_map: LineMap,
    pub types: Vec<ClassDecl>,
}

impl FileDecl {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            package: Vec::new(),
            imports: Vec::new(),
            range: TextRange::default(),
            line_map: LineMap::default(),
            types: Vec::new(),
        }
    }

    /// Set the package from a dotted name. An empty string is the default package.
    pub fn package(mut self, dotted: &str) -> Self {
        self.package = dotted
            .split('.')
            .filter(|s| !s.is_empty())
            .map(SmolStr::new)
            .collect();
        self
    }

    pub fn import(mut self, import: Import) -> Self {
        self.imports.push(import);
        self
    }

    pub fn class(mut self, class: ClassDecl) -> Self {
        self.types.push(class);
        self
    }

    /// Take the file range and line map from the source text.
    pub fn with_text(mut self, text: &str) -> Self {
        self.range = TextRange::new(0, text.len() as u32);
        self.line_map = LineMap::from_text(text);
        self
    }

    pub fn at(mut self, start: u32, end: u32) -> Self {
        self.range = TextRange::new(start, end);
        self
    }
}
