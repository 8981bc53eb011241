//! The per-call pool of caller-supplied arguments.

use crate::key::TypeKey;
use crate::value::Value;
use std::collections::VecDeque;

/// Caller-supplied values for one `get`, `call` or `inject`, grouped by type.
///
/// Groups keep their first-seen order and each group is a FIFO queue, so
/// repeated pulls for one key return values in the order they were supplied.
#[derive(Debug, Default)]
pub struct ArgumentPool {
  groups: Vec<(TypeKey, VecDeque<Value>)>,
}

impl ArgumentPool {
  pub fn new(args: impl IntoIterator<Item = Value>) -> Self {
    let mut pool = Self::default();
    for arg in args {
      pool.push(arg);
    }
    pool
  }

  pub fn push(&mut self, value: Value) {
    match self.groups.iter_mut().find(|(key, _)| key == value.type_key()) {
      Some((_, queue)) => queue.push_back(value),
      None => {
        let key = value.type_key().clone();
        self.groups.push((key, VecDeque::from([value])));
      }
    }
  }

  /// Puts `value` back at the front of its group, undoing a pull.
  pub fn restore(&mut self, value: Value) {
    match self.groups.iter_mut().find(|(key, _)| key == value.type_key()) {
      Some((_, queue)) => queue.push_front(value),
      None => {
        let key = value.type_key().clone();
        self.groups.push((key, VecDeque::from([value])));
      }
    }
  }

  /// Pops the first value whose key equals `key`.
  pub fn pull_exact(&mut self, key: &TypeKey) -> Option<Value> {
    self
      .groups
      .iter_mut()
      .find(|(group, _)| group == key)
      .and_then(|(_, queue)| queue.pop_front())
  }

  /// Pops every value whose key equals `key`, in supply order.
  pub fn drain_exact(&mut self, key: &TypeKey) -> Vec<Value> {
    self
      .groups
      .iter_mut()
      .find(|(group, _)| group == key)
      .map(|(_, queue)| queue.drain(..).collect())
      .unwrap_or_default()
  }

  /// Finds and removes the first value that `convert` accepts.
  ///
  /// Groups keyed differently from `target` are scanned before the group
  /// keyed `target` itself, since exact matches are normally taken by
  /// [`pull_exact`](Self::pull_exact) first.
  pub fn find_convertible<T>(
    &mut self,
    target: &TypeKey,
    convert: impl Fn(&Value) -> Option<T>,
  ) -> Option<T> {
    let others = self.groups.iter_mut().filter(|(key, _)| key != target);
    for (_, queue) in others {
      if let Some(found) = take_first(queue, &convert) {
        return Some(found);
      }
    }
    self
      .groups
      .iter_mut()
      .find(|(key, _)| key == target)
      .and_then(|(_, queue)| take_first(queue, &convert))
  }

  pub fn keys(&self) -> impl Iterator<Item = &TypeKey> {
    self
      .groups
      .iter()
      .filter(|(_, queue)| !queue.is_empty())
      .map(|(key, _)| key)
  }

  pub fn len(&self) -> usize {
    self.groups.iter().map(|(_, queue)| queue.len()).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

fn take_first<T>(queue: &mut VecDeque<Value>, convert: &impl Fn(&Value) -> Option<T>) -> Option<T> {
  let (index, converted) = queue
    .iter()
    .enumerate()
    .find_map(|(index, value)| convert(value).map(|converted| (index, converted)))?;
  queue.remove(index);
  Some(converted)
}
