//! Declaration macro for profiled capability traits.

/// Declare a capability trait whose `#[profiled]` methods are timed when the
/// implementor is wrapped by a [`Profiler`](crate::Profiler).
///
/// The marker may appear anywhere among a method's attributes and doc
/// comments. Methods take `&self` and have no generic parameters.
/// Supertraits are limited to plain trait names such as `Send + Sync`.
///
/// Besides the trait itself this generates:
/// - `impl Interface for dyn Trait` with the static method table,
/// - forwarding impls for `Arc<T>`, `Box<T>` and `&T`,
/// - `impl<D: Trait> Trait for Profiled<dyn Trait, D>`.
///
/// Because of the forwarding impls, a trait declared here cannot also be
/// implemented by hand for `Arc<_>`, `Box<_>` or `&_`.
///
/// # Examples
///
/// ```
/// use webcrawler_profiler::profiled_trait;
///
/// profiled_trait! {
///     /// Turns a page body into words.
///     pub trait PageParser: Send + Sync {
///         /// Split a page into words.
///         #[profiled]
///         fn parse(&self, body: &str) -> Vec<String>;
///
///         fn name(&self) -> &'static str;
///     }
/// }
///
/// struct Whitespace;
///
/// impl PageParser for Whitespace {
///     fn parse(&self, body: &str) -> Vec<String> {
///         body.split_whitespace().map(str::to_owned).collect()
///     }
///
///     fn name(&self) -> &'static str {
///         "whitespace"
///     }
/// }
///
/// let profiler = webcrawler_profiler::Profiler::system();
/// let parser = profiler.wrap::<dyn PageParser, _>(Whitespace).unwrap();
/// assert_eq!(parser.parse("a b"), ["a", "b"]);
/// assert_eq!(profiler.state().len(), 1);
/// ```
#[macro_export]
macro_rules! profiled_trait {
    // Marker attribute.
    (
        @munch
        meta: $meta:tt
        vis: $vis:tt
        name: $name:ident
        bounds: $bounds:tt
        methods: $done:tt
        pending: { $profiled:tt $attrs:tt }
        rest: [#[profiled] $($rest:tt)*]
    ) => {
        $crate::profiled_trait! {
            @munch
            meta: $meta
            vis: $vis
            name: $name
            bounds: $bounds
            methods: $done
            pending: { true $attrs }
            rest: [$($rest)*]
        }
    };

    // Any other attribute, doc comments included.
    (
        @munch
        meta: $meta:tt
        vis: $vis:tt
        name: $name:ident
        bounds: $bounds:tt
        methods: $done:tt
        pending: { $profiled:tt [$($attr:tt)*] }
        rest: [#[$next:meta] $($rest:tt)*]
    ) => {
        $crate::profiled_trait! {
            @munch
            meta: $meta
            vis: $vis
            name: $name
            bounds: $bounds
            methods: $done
            pending: { $profiled [$($attr)* #[$next]] }
            rest: [$($rest)*]
        }
    };

    // Method declaration, taking the attributes gathered so far.
    (
        @munch
        meta: $meta:tt
        vis: $vis:tt
        name: $name:ident
        bounds: $bounds:tt
        methods: [$($done:tt)*]
        pending: { $profiled:tt $attrs:tt }
        rest: [
            fn $method:ident(&self $(, $arg:ident : $argty:ty)* $(,)?) $(-> $ret:ty)?;
            $($rest:tt)*
        ]
    ) => {
        $crate::profiled_trait! {
            @munch
            meta: $meta
            vis: $vis
            name: $name
            bounds: $bounds
            methods: [
                $($done)*
                { $profiled $attrs $method [$($arg : $argty),*] [$($ret)?] }
            ]
            pending: { false [] }
            rest: [$($rest)*]
        }
    };

    (
        @munch
        meta: [$($meta:tt)*]
        vis: [$($vis:tt)*]
        name: $name:ident
        bounds: [$($bounds:tt)*]
        methods: [$({
            $profiled:tt
            [$($attr:tt)*]
            $method:ident
            [$($arg:ident : $argty:ty),*]
            [$($ret:ty)?]
        })*]
        pending: { false [] }
        rest: []
    ) => {
        $($meta)*
        $($vis)* trait $name $($bounds)* {
            $(
                $($attr)*
                fn $method(&self $(, $arg: $argty)*) $(-> $ret)?;
            )*

            #[doc(hidden)]
            fn __owner_type(&self) -> &'static str {
                ::core::any::type_name::<Self>()
            }
        }

        impl $crate::Interface for dyn $name {
            const NAME: &'static str = ::core::stringify!($name);
            const METHODS: &'static [$crate::MethodSpec] = &[
                $($crate::__method_spec!($profiled $method ($($arg: $argty),*) $(-> $ret)?),)*
            ];
        }

        impl<D: $name> $name for $crate::Profiled<dyn $name, D> {
            $(
                fn $method(&self $(, $arg: $argty)*) $(-> $ret)? {
                    static SPEC: $crate::MethodSpec =
                        $crate::__method_spec!($profiled $method ($($arg: $argty),*) $(-> $ret)?);
                    let delegate = self.delegate();
                    self.__interceptor().invoke(
                        <D as $name>::__owner_type(delegate),
                        &SPEC,
                        move || <D as $name>::$method(delegate $(, $arg)*),
                    )
                }
            )*

            fn __owner_type(&self) -> &'static str {
                <D as $name>::__owner_type(self.delegate())
            }
        }

        $crate::__forward_impl!($name for ::std::sync::Arc<T> {
            $($method ($($arg: $argty),*) $(-> $ret)?;)*
        });
        $crate::__forward_impl!($name for ::std::boxed::Box<T> {
            $($method ($($arg: $argty),*) $(-> $ret)?;)*
        });
        $crate::__forward_impl!($name for &T {
            $($method ($($arg: $argty),*) $(-> $ret)?;)*
        });
    };

    (
        $(#[$meta:meta])*
        $vis:vis trait $name:ident $(: $bound:ident $(+ $more:ident)*)? {
            $($body:tt)*
        }
    ) => {
        $crate::profiled_trait! {
            @munch
            meta: [$(#[$meta])*]
            vis: [$vis]
            name: $name
            bounds: [$(: $bound $(+ $more)*)?]
            methods: []
            pending: { false [] }
            rest: [$($body)*]
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __method_spec {
    ($profiled:tt $method:ident ($($arg:ident : $argty:ty),*) $(-> $ret:ty)?) => {
        $crate::MethodSpec {
            name: ::core::stringify!($method),
            signature: ::core::stringify!(fn $method(&self $(, $arg: $argty)*) $(-> $ret)?),
            profiled: $profiled,
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __forward_impl {
    ($name:ident for $ptr:ty {
        $($method:ident ($($arg:ident : $argty:ty),*) $(-> $ret:ty)?;)*
    }) => {
        impl<T: $name + ?Sized> $name for $ptr {
            $(
                fn $method(&self $(, $arg: $argty)*) $(-> $ret)? {
                    <T as $name>::$method(&**self $(, $arg)*)
                }
            )*

            fn __owner_type(&self) -> &'static str {
                <T as $name>::__owner_type(&**self)
            }
        }
    };
}
