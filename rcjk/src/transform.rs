//! Construction of component placement transforms.

use kurbo::Affine;

/// Build the affine transform that places a component.
///
/// The rotation center is given in the component's unscaled coordinate
/// space, so it is scaled along with the outline before the rotation is
/// applied. In order, the resulting transform scales, rotates
/// `rotation` degrees counter-clockwise about the scaled center, and then
/// translates by `(x, y)`.
pub fn make_transform(
    x: f64,
    y: f64,
    rotation: f64,
    scale_x: f64,
    scale_y: f64,
    center_x: f64,
    center_y: f64,
) -> Affine {
    let center_x = center_x * scale_x;
    let center_y = center_y * scale_y;
    Affine::translate((x + center_x, y + center_y))
        * Affine::rotate(rotation.to_radians())
        * Affine::translate((-center_x, -center_y))
        * Affine::scale_non_uniform(scale_x, scale_y)
}

/// Place a child transform inside the coordinate space of its parent.
///
/// The child is applied first.
pub fn compose(parent: Affine, child: Affine) -> Affine {
    parent * child
}
