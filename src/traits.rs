use crate::id::RecordId;

pub trait Indexable {
  /// `None` until the server has assigned one.
  fn id(&self) -> Option<&RecordId>;
}
