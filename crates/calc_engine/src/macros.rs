/// Declare a shallow rule as a unit struct with an inline body.
#[macro_export]
macro_rules! define_rule {
    (
        $(#[$meta:meta])*
        $struct_name:ident,
        $label:expr,
        $targets:expr,
        | $ctx:ident, $expr:ident, $rctx:ident | $body:block
    ) => {
        $(#[$meta])*
        pub struct $struct_name;

        impl $crate::rule::Rule for $struct_name {
            fn name(&self) -> &'static str {
                $label
            }

            #[allow(unused_variables)]
            fn apply(
                &self,
                $ctx: &mut calc_ast::Context,
                $expr: calc_ast::ExprId,
                $rctx: &$crate::options::ReductionContext,
            ) -> Option<$crate::rule::Rewrite> {
                $body
            }

            fn target_kinds(&self) -> Option<&'static [&'static str]> {
                $targets
            }
        }
    };
}
