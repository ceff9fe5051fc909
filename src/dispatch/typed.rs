//! Typed functions: one generic operation name, many signatures.
//!
//! A `TypedFunctionBuilder` collects `(signature, implementation)` pairs and
//! rejects duplicates. `build` freezes it into a `TypedFunction`, which has
//! no registration API, so the table is read-only from then on. Resolution
//! results are memoized per argument type tuple in a sharded concurrent map;
//! two threads racing on the same key compute the same answer and the later
//! insert simply overwrites it.

use std::hash::BuildHasherDefault;
use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxHasher;

use crate::algorithm::ZeroFlags;
use crate::context::{Capabilities, OperationContext};
use crate::dispatch::conversion::CONVERSIONS;
use crate::dispatch::signature::Signature;
use crate::error::{MathError, Result};
use crate::value::{TypeTag, Value};

/// Implementation callable registered under a signature.
pub type Implementation =
    Arc<dyn Fn(&OperationContext<'_>, &[&Value]) -> Result<Value> + Send + Sync>;

struct Entry {
    signature: Signature,
    implementation: Implementation,
}

/// Outcome of resolving an argument type tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Registration index of the chosen signature.
    pub index: usize,
    /// Per argument, the `CONVERSIONS` entry to apply, if any.
    pub conversions: Vec<Option<usize>>,
}

impl Resolution {
    pub fn is_direct(&self) -> bool {
        self.conversions.iter().all(Option::is_none)
    }
}

/// Registration phase of a typed function.
pub struct TypedFunctionBuilder {
    name: String,
    flags: ZeroFlags,
    entries: Vec<Entry>,
}

impl TypedFunctionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: ZeroFlags::empty(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare how the operation treats implicit zeros.
    pub fn flags(&mut self, flags: ZeroFlags) -> &mut Self {
        self.flags = flags;
        self
    }

    /// Register an implementation under a signature given in text form.
    pub fn register<F>(&mut self, signature: &str, f: F) -> Result<&mut Self>
    where
        F: Fn(&OperationContext<'_>, &[&Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let signature: Signature = signature.parse()?;
        self.register_signature(signature, f)
    }

    pub fn register_signature<F>(&mut self, signature: Signature, f: F) -> Result<&mut Self>
    where
        F: Fn(&OperationContext<'_>, &[&Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let implementation: Implementation = Arc::new(f);
        if self.entries.iter().any(|e| e.signature == signature) {
            return Err(MathError::DuplicateSignature {
                name: self.name.clone(),
                signature: signature.to_string(),
            });
        }
        tracing::debug!(function = %self.name, %signature, "registered signature");
        self.entries.push(Entry { signature, implementation });
        Ok(self)
    }

    pub fn build(self) -> TypedFunction {
        TypedFunction {
            name: self.name,
            flags: self.flags,
            entries: self.entries,
            cache: DashMap::with_hasher(BuildHasherDefault::default()),
        }
    }
}

/// A frozen generic operation.
pub struct TypedFunction {
    name: String,
    flags: ZeroFlags,
    entries: Vec<Entry>,
    cache: DashMap<Vec<TypeTag>, Resolution, BuildHasherDefault<FxHasher>>,
}

impl std::fmt::Debug for TypedFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedFunction")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("signatures", &self.entries.iter().map(|e| e.signature.to_string()).collect::<Vec<_>>())
            .finish()
    }
}

impl TypedFunction {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> ZeroFlags {
        self.flags
    }

    pub fn signatures(&self) -> impl Iterator<Item = &Signature> {
        self.entries.iter().map(|e| &e.signature)
    }

    /// Number of memoized type tuples.
    pub fn cached_resolutions(&self) -> usize {
        self.cache.len()
    }

    /// Resolve and memoize.
    pub fn resolve(&self, tags: &[TypeTag]) -> Result<Resolution> {
        if let Some(hit) = self.cache.get(tags) {
            return Ok(hit.clone());
        }
        let resolution = self.resolve_uncached(tags)?;
        self.cache.insert(tags.to_vec(), resolution.clone());
        Ok(resolution)
    }

    /// Pick the best signature for `tags`.
    ///
    /// Direct matches always win. Among them the lowest total specificity is
    /// chosen, then the lowest left-to-right specificity, then the earliest
    /// registration. Without a direct match, conversions are tried and the
    /// signature needing the fewest converted positions wins, ties going to
    /// the earliest registration.
    pub fn resolve_uncached(&self, tags: &[TypeTag]) -> Result<Resolution> {
        let direct = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(index, e)| e.signature.direct_match(tags).map(|score| (index, score)))
            .min_by(|(ia, a), (ib, b)| {
                let sum = |s: &Vec<u8>| s.iter().map(|&x| x as u32).sum::<u32>();
                sum(a).cmp(&sum(b)).then_with(|| a.cmp(b)).then_with(|| ia.cmp(ib))
            });
        if let Some((index, _)) = direct {
            tracing::trace!(function = %self.name, ?tags, signature = %self.entries[index].signature, "resolved");
            return Ok(Resolution { index, conversions: vec![None; tags.len()] });
        }

        let converted = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.signature.arity() == tags.len())
            .filter_map(|(index, e)| {
                let conversions = e
                    .signature
                    .params()
                    .iter()
                    .zip(tags)
                    .map(|(param, &tag)| {
                        if param.accepts(tag) {
                            return Some(None);
                        }
                        CONVERSIONS
                            .iter()
                            .position(|c| c.from == tag && param.accepts(c.to))
                            .map(Some)
                    })
                    .collect::<Option<Vec<_>>>()?;
                let count = conversions.iter().filter(|c| c.is_some()).count();
                Some((count, index, conversions))
            })
            .min_by_key(|(count, index, _)| (*count, *index));

        match converted {
            Some((_, index, conversions)) => {
                tracing::trace!(
                    function = %self.name,
                    ?tags,
                    signature = %self.entries[index].signature,
                    "resolved through conversion"
                );
                Ok(Resolution { index, conversions })
            }
            None => Err(MathError::NoMatchingSignature {
                name: self.name.clone(),
                types: tags.iter().map(|t| t.name()).collect::<Vec<_>>().join(", "),
            }),
        }
    }

    /// Resolve for the current options: memoized unless
    /// `cache_resolutions` is off.
    pub fn resolve_for(&self, caps: &Capabilities, tags: &[TypeTag]) -> Result<Resolution> {
        if caps.options().cache_resolutions {
            self.resolve(tags)
        } else {
            self.resolve_uncached(tags)
        }
    }

    /// Resolve the argument types, convert where needed and run the chosen
    /// implementation.
    pub fn invoke(&self, caps: &Capabilities, args: &[&Value]) -> Result<Value> {
        let pair;
        let many;
        let tags: &[TypeTag] = if let [x, y] = args {
            pair = [x.type_tag(), y.type_tag()];
            &pair
        } else {
            many = args.iter().map(|a| a.type_tag()).collect::<Vec<_>>();
            &many
        };
        let resolution = self.resolve_for(caps, tags)?;
        self.invoke_resolved(caps, &resolution, args)
    }

    /// Run the implementation picked by `resolution`, which must have been
    /// resolved for the type tags of `args`.
    pub fn invoke_resolved(
        &self,
        caps: &Capabilities,
        resolution: &Resolution,
        args: &[&Value],
    ) -> Result<Value> {
        let ctx = OperationContext::new(self, caps);
        let implementation = &self.entries[resolution.index].implementation;
        if resolution.is_direct() {
            return implementation(&ctx, args);
        }
        let converted = args
            .iter()
            .zip(&resolution.conversions)
            .map(|(arg, conversion)| {
                conversion
                    .map(|i| (CONVERSIONS[i].convert)(arg, caps.options()))
                    .transpose()
            })
            .collect::<Result<Vec<Option<Value>>>>()?;
        let refs: Vec<&Value> = args
            .iter()
            .zip(&converted)
            .map(|(&arg, c)| c.as_ref().unwrap_or(arg))
            .collect();
        implementation(&ctx, &refs)
    }

    /// Convenience wrapper over `invoke` for owned arguments.
    pub fn call(&self, caps: &Capabilities, args: &[Value]) -> Result<Value> {
        let refs: Vec<&Value> = args.iter().collect();
        self.invoke(caps, &refs)
    }
}
