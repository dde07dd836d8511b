use crate::solver::{SolvedType, TypeSolver};

/// Assignability between solved types, as used for method invocation.
pub struct Conversions<'s, 'a> {
    solver: &'s TypeSolver<'a>,
}

impl<'s, 'a> Conversions<'s, 'a> {
    pub fn new(solver: &'s TypeSolver<'a>) -> Self {
        Self { solver }
    }

    /// Identity or reference widening. No boxing.
    pub fn is_strictly_assignable(&self, arg: &SolvedType, param: &SolvedType) -> bool {
        arg.same_type(param) || self.is_reference_widening(arg, param)
    }

    /// Strict conversions plus primitive widening, boxing and unboxing.
    pub fn is_loosely_assignable(&self, arg: &SolvedType, param: &SolvedType) -> bool {
        self.is_strictly_assignable(arg, param)
            || self.is_primitive_widening(arg, param)
            || self.is_boxing(arg, param)
            || self.is_unboxing(arg, param)
    }

    fn is_reference_widening(&self, arg: &SolvedType, param: &SolvedType) -> bool {
        if !arg.is_reference() || !param.is_reference() {
            return false;
        }
        // A type parameter accepts any reference type.
        if param.is_type_variable() && !param.is_array {
            return true;
        }
        if !param.is_array && self.is_root(param) {
            return true;
        }
        match (arg.is_array, param.is_array) {
            (true, true) => {
                let (arg, param) = (arg.element(), param.element());
                arg.same_type(&param)
                    || (arg.is_reference()
                        && param.is_reference()
                        && self.is_reference_widening(&arg, &param))
            }
            (false, false) => {
                let Some(arg) = self.solver.upper_bound(arg) else {
                    return false;
                };
                self.solver.is_subclass(&arg, param)
            }
            _ => false,
        }
    }

    fn is_primitive_widening(&self, arg: &SolvedType, param: &SolvedType) -> bool {
        match (arg.as_primitive(), param.as_primitive()) {
            (Some(from), Some(to)) => self.solver.profile().primitive_widens(from, to),
            _ => false,
        }
    }

    /// Box the primitive argument, then widen the box as a reference.
    fn is_boxing(&self, arg: &SolvedType, param: &SolvedType) -> bool {
        let Some(primitive) = arg.as_primitive() else {
            return false;
        };
        if !param.is_reference() {
            return false;
        }
        let Some(box_name) = self.solver.profile().boxed_type(primitive) else {
            return false;
        };
        match self.solver.find_qualified_type(box_name) {
            Some(boxed) => self.is_strictly_assignable(&boxed, param),
            // The box class is not indexed; only targets known to accept it.
            None => {
                !param.is_array
                    && (param.is_type_variable()
                        || self.is_root(param)
                        || self.solver.qualified_name(param).as_deref() == Some(box_name))
            }
        }
    }

    /// Unbox the argument, then widen the primitive.
    fn is_unboxing(&self, arg: &SolvedType, param: &SolvedType) -> bool {
        let Some(target) = param.as_primitive() else {
            return false;
        };
        if arg.is_array || arg.entity_ref().is_none() {
            return false;
        }
        let Some(name) = self.solver.qualified_name(arg) else {
            return false;
        };
        let profile = self.solver.profile();
        match profile.unboxed_type(&name) {
            Some(unboxed) => unboxed == target || profile.primitive_widens(unboxed, target),
            None => false,
        }
    }

    fn is_root(&self, ty: &SolvedType) -> bool {
        let Some(root) = self.solver.profile().root_type() else {
            return false;
        };
        ty.entity_ref().is_some() && self.solver.qualified_name(ty).as_deref() == Some(root)
    }
}
