use crate::{id::RecordId, traits::Indexable};

/// Ordered, flat cache of records mirroring one server resource.
#[derive(Debug, Clone)]
pub struct Collection<T> {
  items: Vec<T>,
}

impl<T> Default for Collection<T> {
  fn default() -> Self {
    Self { items: Vec::new() }
  }
}

impl<T> Collection<T>
where
  T: Indexable + Clone,
{
  pub fn new() -> Self {
    Self::default()
  }

  pub fn all(&self) -> &[T] {
    self.items.as_slice()
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn first(&self) -> Option<&T> {
    self.items.first()
  }

  pub fn get_by_id(&self, id: &RecordId) -> Option<&T> {
    self.items.iter().find(|item| item.id() == Some(id))
  }

  pub fn position_by_id(&self, id: &RecordId) -> Option<usize> {
    self.items.iter().position(|item| item.id() == Some(id))
  }

  pub fn add(&mut self, item: T) {
    self.items.push(item);
  }

  /// Puts `item` in place of the entry matching `id`. Returns `false` and
  /// leaves the collection alone when nothing matches.
  pub fn replace(&mut self, id: &RecordId, item: T) -> bool {
    match self.position_by_id(id) {
      Some(position) => {
        self.items[position] = item;
        true
      }
      None => false,
    }
  }

  /// Drops every entry matching `id`, returning how many were removed.
  pub fn remove(&mut self, id: &RecordId) -> usize {
    let before = self.items.len();
    self.items.retain(|item| item.id() != Some(id));
    return before - self.items.len();
  }

  pub fn retain<F>(&mut self, keep: F)
  where
    F: FnMut(&T) -> bool,
  {
    self.items.retain(keep);
  }

  pub fn replace_all(&mut self, items: Vec<T>) {
    self.items = items;
  }
}

#[cfg(test)]
mod tests {
  use super::{Collection, Indexable, RecordId};

  #[derive(Clone, Debug)]
  struct Item {
    id: Option<RecordId>,
    title: String,
  }

  impl Item {
    fn new(id: i64, title: &str) -> Self {
      Self {
        id: Some(RecordId::from(id)),
        title: title.to_owned(),
      }
    }
  }

  impl Indexable for Item {
    fn id(&self) -> Option<&RecordId> {
      self.id.as_ref()
    }
  }

  #[test]
  fn collection_add() {
    let mut items = Collection::new();
    items.add(Item::new(1, "Hello"));

    assert_eq!(items.len(), 1);
    assert_eq!(items.first().unwrap().title, "Hello");
  }

  #[test]
  fn collection_lookup_is_loose() {
    let mut items = Collection::new();
    items.add(Item::new(1, "Hello"));

    assert!(items.get_by_id(&RecordId::from("1")).is_some());
    assert!(items.get_by_id(&RecordId::from(2)).is_none());
  }

  #[test]
  fn collection_remove() {
    let mut items = Collection::new();
    items.add(Item::new(1, "Hello"));
    items.add(Item::new(2, "World"));

    assert_eq!(items.remove(&RecordId::from("1")), 1);
    assert_eq!(items.len(), 1);
    assert!(items.get_by_id(&RecordId::from(1)).is_none());
  }

  #[test]
  fn collection_remove_from_empty() {
    let mut items: Collection<Item> = Collection::new();
    assert_eq!(items.remove(&RecordId::from(1)), 0);
  }

  #[test]
  fn collection_replace_keeps_position() {
    let mut items = Collection::new();
    items.add(Item::new(1, "Hello"));
    items.add(Item::new(2, "World"));

    assert!(items.replace(&RecordId::from(1), Item::new(1, "Hello, world!")));

    let all = items.all();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].title, "Hello, world!");
    assert_eq!(all[1].title, "World");
  }

  #[test]
  fn collection_replace_unknown_id() {
    let mut items = Collection::new();
    items.add(Item::new(1, "Hello"));

    assert!(!items.replace(&RecordId::from(9), Item::new(9, "nope")));
    assert_eq!(items.len(), 1);
  }

  #[test]
  fn records_without_id_never_match() {
    let mut items = Collection::new();
    items.add(Item {
      id: None,
      title: "draft".to_owned(),
    });

    assert!(items.get_by_id(&RecordId::from(0)).is_none());
    assert_eq!(items.remove(&RecordId::from(0)), 0);
  }
}
