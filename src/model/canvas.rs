//! Pure mutations over the ordered list of placed photos.
//!
//! Every function returns a new list and leaves its input untouched, so a
//! snapshot handed to an observer never changes underneath it. Iteration order
//! is insertion order, which is also paint order.

use egui::Pos2;

use super::photo::{CanvasPhoto, CanvasPhotoAttributes, Photo};

/// Append a new placement of `photo` at `position` with scale 1 and no rotation
pub fn add(list: &[CanvasPhoto], photo: &Photo, position: Pos2) -> Vec<CanvasPhoto> {
    let mut next = Vec::with_capacity(list.len() + 1);
    next.extend_from_slice(list);
    next.push(CanvasPhoto::place(photo, position));
    next
}

/// Drop the entry with `instance_id`. Unknown ids leave the list as it was.
pub fn remove(list: &[CanvasPhoto], instance_id: &str) -> Vec<CanvasPhoto> {
    let mut next = list.to_vec();
    if let Some(index) = list.iter().position(|p| p.instance_id() == instance_id) {
        next.remove(index);
    }
    next
}

/// Replace the attributes of the entry with `instance_id`, keeping its slot in the order.
/// Scale is clamped. Unknown ids leave the list as it was.
pub fn transform(
    list: &[CanvasPhoto],
    instance_id: &str,
    position: Pos2,
    scale: f32,
    rotation: f32,
) -> Vec<CanvasPhoto> {
    let attributes = CanvasPhotoAttributes::new(position, scale, rotation);
    list.iter()
        .map(|p| {
            if p.instance_id() == instance_id {
                p.with_attributes(attributes)
            } else {
                p.clone()
            }
        })
        .collect()
}

/// Look up a placed photo by instance id
pub fn find<'a>(list: &'a [CanvasPhoto], instance_id: &str) -> Option<&'a CanvasPhoto> {
    list.iter().find(|p| p.instance_id() == instance_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn sample() -> Vec<CanvasPhoto> {
        vec![
            CanvasPhoto::from_parts("a", "p1", "asset://cat", CanvasPhotoAttributes::at(pos2(1.0, 1.0))),
            CanvasPhoto::from_parts("b", "p2", "asset://koala", CanvasPhotoAttributes::at(pos2(2.0, 2.0))),
            CanvasPhoto::from_parts("c", "p1", "asset://cat", CanvasPhotoAttributes::at(pos2(3.0, 3.0))),
        ]
    }

    #[test]
    fn transform_keeps_order_and_replaces_all_fields() {
        let list = sample();
        let next = transform(&list, "b", pos2(50.0, 60.0), 2.0, 45.0);
        let ids: Vec<_> = next.iter().map(|p| p.instance_id()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(
            next[1].attributes(),
            CanvasPhotoAttributes {
                x: 50.0,
                y: 60.0,
                scale: 2.0,
                rotation: 45.0
            }
        );
        assert_eq!(next[1].source_id(), "p2");
        // input untouched
        assert_eq!(list[1].attributes().x, 2.0);
    }

    #[test]
    fn transform_clamps_scale() {
        let next = transform(&sample(), "a", pos2(0.0, 0.0), 12.0, 0.0);
        assert_eq!(next[0].attributes().scale, 5.0);
    }

    #[test]
    fn same_source_placed_twice_gets_distinct_ids() {
        let photo = Photo::with_id("p1", "asset://cat");
        let once = add(&[], &photo, pos2(0.0, 0.0));
        let twice = add(&once, &photo, pos2(10.0, 0.0));
        assert_eq!(twice.len(), 2);
        assert_ne!(twice[0].instance_id(), twice[1].instance_id());
        assert_eq!(twice[1].source_id(), "p1");
    }
}
