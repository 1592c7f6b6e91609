use std::fmt::{Formatter, Result as FmtResult};
use std::mem::take;

use crate::{Args, Matcher, Value};

type KeywordMatcher = (String, Box<dyn Matcher<Value> + Send + Sync>);

/// Create an argument list matcher from a tuple of per-argument matchers.
///
/// The call must have exactly as many positional arguments as matchers were
/// passed, and exactly the keywords added with [`Multi::keyword`].
pub fn multi<T>(matchers: T) -> Multi<T> {
    Multi {
        matchers,
        keywords: Vec::new(),
    }
}

#[must_use]
pub struct Multi<T> {
    matchers: T,
    keywords: Vec<KeywordMatcher>,
}

impl<T> Multi<T> {
    /// Expect the keyword argument `name` to match `matcher`.
    pub fn keyword<S, M>(mut self, name: S, matcher: M) -> Self
    where
        S: Into<String>,
        M: Matcher<Value> + Send + Sync + 'static,
    {
        self.keywords.push((name.into(), Box::new(matcher)));

        self
    }

    fn keywords_match(&self, args: &Args) -> bool {
        args.keywords.len() == self.keywords.len()
            && self.keywords.iter().all(|(name, matcher)| {
                args.keyword(name)
                    .is_some_and(|value| matcher.matches(value))
            })
    }

    fn fmt_keywords(&self, f: &mut Formatter<'_>, mut first: bool) -> FmtResult {
        for (name, matcher) in &self.keywords {
            if !take(&mut first) {
                write!(f, ", ")?;
            }

            write!(f, "{name}: ")?;
            matcher.fmt(f)?;
        }

        Ok(())
    }
}

macro_rules! impl_multi {
    ($( $arg_name:ident => $matcher_name:ident: $matcher_type:ident ),+) => {
        impl<$( $matcher_type ),+> Matcher<Args> for Multi<($( $matcher_type, )+)>
        where
            $(
                $matcher_type: Matcher<Value>,
            )+
        {
            fn matches(&self, args: &Args) -> bool {
                let [$( $arg_name ),+] = args.positional.as_slice() else {
                    return false;
                };
                let ($( $matcher_name, )+) = &self.matchers;

                $(
                    $matcher_name.matches($arg_name)
                )&&+ && self.keywords_match(args)
            }

            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                let mut first = true;
                let ($( $matcher_name, )+) = &self.matchers;

                $(
                    if !take(&mut first) {
                        write!(f, ", ")?;
                    }

                    $matcher_name.fmt(f)?;
                )+

                self.fmt_keywords(f, first)
            }
        }
    };
}

impl_multi!(a0 => m0: M0);
impl_multi!(a0 => m0: M0, a1 => m1: M1);
impl_multi!(a0 => m0: M0, a1 => m1: M1, a2 => m2: M2);
impl_multi!(a0 => m0: M0, a1 => m1: M1, a2 => m2: M2, a3 => m3: M3);
impl_multi!(a0 => m0: M0, a1 => m1: M1, a2 => m2: M2, a3 => m3: M3, a4 => m4: M4);
impl_multi!(a0 => m0: M0, a1 => m1: M1, a2 => m2: M2, a3 => m3: M3, a4 => m4: M4, a5 => m5: M5);
impl_multi!(a0 => m0: M0, a1 => m1: M1, a2 => m2: M2, a3 => m3: M3, a4 => m4: M4, a5 => m5: M5, a6 => m6: M6);
impl_multi!(a0 => m0: M0, a1 => m1: M1, a2 => m2: M2, a3 => m3: M3, a4 => m4: M4, a5 => m5: M5, a6 => m6: M6, a7 => m7: M7);
