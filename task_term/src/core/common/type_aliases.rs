// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use smallvec::SmallVec;

pub type StdMutex<T> = std::sync::Mutex<T>;

/// Most edits echo one or two chunks, so keep them on the stack.
pub const DEFAULT_INLINE_VEC_SIZE: usize = 2;

pub type InlineVec<T> = SmallVec<[T; DEFAULT_INLINE_VEC_SIZE]>;
