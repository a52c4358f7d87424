/// Describes on which side of a directed line a point lies.
///
/// Created by [side_query](crate::math::side_query). All terms assume a
/// right handed coordinate system (x axis to the right, y axis upwards).
#[derive(Debug, Clone, Copy)]
pub struct LineSideInfo {
    signed_side: f64,
}

impl PartialEq for LineSideInfo {
    fn eq(&self, other: &LineSideInfo) -> bool {
        if self.is_on_line() || other.is_on_line() {
            self.is_on_line() && other.is_on_line()
        } else {
            self.is_on_left_side() == other.is_on_left_side()
        }
    }
}

impl LineSideInfo {
    #[inline]
    pub(crate) fn from_determinant(s: f64) -> LineSideInfo {
        LineSideInfo { signed_side: s }
    }

    /// Returns `true` if the point lies strictly left of the line, i.e. the line's start,
    /// end and the point are ordered counter clockwise.
    pub fn is_on_left_side(&self) -> bool {
        self.signed_side > 0.0
    }

    /// Returns `true` if the point lies strictly right of the line.
    pub fn is_on_right_side(&self) -> bool {
        self.signed_side < 0.0
    }

    /// Returns `true` if the point lies left of the line or on the line itself.
    pub fn is_on_left_side_or_on_line(&self) -> bool {
        self.signed_side >= 0.0
    }

    /// Returns `true` if the point is collinear with the line.
    #[inline]
    pub fn is_on_line(&self) -> bool {
        self.signed_side == 0.0
    }
}
