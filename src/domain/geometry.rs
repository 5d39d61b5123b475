//! Circle primitives and the front-chain sibling packing algorithm.
//!
//! `pack_siblings` places a set of pre-sized circles around the origin so that
//! no two overlap, using an incremental front chain: each new circle is placed
//! tangent to the chain pair currently closest to the centroid, and the chain
//! is spliced whenever the placement collides with another boundary circle.
//! The final arrangement is recentered on its minimal enclosing circle
//! (Welzl's algorithm, run in input order so results are reproducible).

use serde::Serialize;
use tracing::trace;

/// Distance slack used when testing circle overlap. Tangent circles produced
/// by floating-point placement must not register as intersecting.
const EPSILON: f64 = 1e-6;

/// A circle in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }

    /// Distance between the centers of two circles.
    pub fn center_distance(&self, other: &Circle) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Whether `other` lies entirely inside this circle (within `eps`).
    pub fn contains(&self, other: &Circle, eps: f64) -> bool {
        self.center_distance(other) + other.r <= self.r + eps
    }
}

/// Strict overlap test with tangency slack.
fn intersects(a: &Circle, b: &Circle) -> bool {
    let dr = a.r + b.r - EPSILON;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

/// Position `c` tangent to both `b` and `a`, on the outside of the chain.
///
/// The two tangency constraints leave two mirror solutions; the branch below
/// picks the one on the advancing side of the front, which is what keeps the
/// chain convex as circles are appended.
fn place(b: &Circle, a: &Circle, c: &mut Circle) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d2 = dx * dx + dy * dy;
    if d2 > 0.0 {
        let mut a2 = a.r + c.r;
        a2 *= a2;
        let mut b2 = b.r + c.r;
        b2 *= b2;
        if a2 > b2 {
            let x = (d2 + b2 - a2) / (2.0 * d2);
            let y = (b2 / d2 - x * x).max(0.0).sqrt();
            c.x = b.x - x * dx - y * dy;
            c.y = b.y - x * dy + y * dx;
        } else {
            let x = (d2 + a2 - b2) / (2.0 * d2);
            let y = (a2 / d2 - x * x).max(0.0).sqrt();
            c.x = a.x + x * dx - y * dy;
            c.y = a.y + x * dy + y * dx;
        }
    } else {
        c.x = a.x + c.r;
        c.y = a.y;
    }
}

/// Node of the circular front chain. Spliced-out nodes are simply abandoned;
/// the backing vector is scratch storage for one `pack_siblings` call.
struct FrontNode {
    /// Index into the circles slice
    circle: usize,
    next: usize,
    prev: usize,
}

/// Squared distance from the origin to the weighted midpoint of a chain pair.
/// The pair with the lowest score is the most central gap on the boundary and
/// the best anchor for the next placement.
fn score(chain: &[FrontNode], circles: &[Circle], node: usize) -> f64 {
    let a = &circles[chain[node].circle];
    let b = &circles[chain[chain[node].next].circle];
    let ab = a.r + b.r;
    let dx = (a.x * b.r + b.x * a.r) / ab;
    let dy = (a.y * b.r + b.y * a.r) / ab;
    dx * dx + dy * dy
}

/// Pack sibling circles around the origin without overlap.
///
/// Circle radii are taken as given; positions are overwritten. Returns the
/// radius of the minimal enclosing circle, and recenters the arrangement so
/// that circle is at the origin. Placement is fully deterministic in input
/// order.
pub fn pack_siblings(circles: &mut [Circle]) -> f64 {
    let n = circles.len();
    if n == 0 {
        return 0.0;
    }

    circles[0].x = 0.0;
    circles[0].y = 0.0;
    if n == 1 {
        return circles[0].r;
    }

    circles[0].x = -circles[1].r;
    circles[1].x = circles[0].r;
    circles[1].y = 0.0;
    if n == 2 {
        return circles[0].r + circles[1].r;
    }

    {
        let (head, tail) = circles.split_at_mut(2);
        place(&head[1], &head[0], &mut tail[0]);
    }

    // Front chain over the first three circles: 0 -> 1 -> 2 -> 0.
    let mut chain: Vec<FrontNode> = Vec::with_capacity(n);
    chain.push(FrontNode { circle: 0, next: 1, prev: 2 });
    chain.push(FrontNode { circle: 1, next: 2, prev: 0 });
    chain.push(FrontNode { circle: 2, next: 0, prev: 1 });
    let mut a = 0usize;
    let mut b = 1usize;

    let mut i = 3;
    while i < n {
        let mut cand = circles[i];
        place(&circles[chain[a].circle], &circles[chain[b].circle], &mut cand);

        // Walk outward from the anchor pair, alternating by accumulated arc
        // length, looking for a boundary circle the candidate collides with.
        let mut j = chain[b].next;
        let mut k = chain[a].prev;
        let mut sj = circles[chain[b].circle].r;
        let mut sk = circles[chain[a].circle].r;
        let mut spliced = false;
        loop {
            if sj <= sk {
                if intersects(&circles[chain[j].circle], &cand) {
                    // Collision ahead: close the chain over the skipped nodes
                    // and retry the placement against the new pair.
                    b = j;
                    chain[a].next = b;
                    chain[b].prev = a;
                    spliced = true;
                    break;
                }
                sj += circles[chain[j].circle].r;
                j = chain[j].next;
            } else {
                if intersects(&circles[chain[k].circle], &cand) {
                    a = k;
                    chain[a].next = b;
                    chain[b].prev = a;
                    spliced = true;
                    break;
                }
                sk += circles[chain[k].circle].r;
                k = chain[k].prev;
            }
            if j == chain[k].next {
                break;
            }
        }
        if spliced {
            continue;
        }

        // No collision: commit the placement and insert it into the chain.
        circles[i] = cand;
        let c = chain.len();
        chain.push(FrontNode { circle: i, next: b, prev: a });
        chain[a].next = c;
        chain[b].prev = c;

        // Re-anchor on the chain pair closest to the centroid.
        let mut best = a;
        let mut best_score = score(&chain, circles, a);
        let mut cur = chain[c].next;
        while cur != c {
            let s = score(&chain, circles, cur);
            if s < best_score {
                best = cur;
                best_score = s;
            }
            cur = chain[cur].next;
        }
        a = best;
        b = chain[a].next;

        i += 1;
    }

    // Enclose the boundary circles and recenter the whole arrangement.
    let mut boundary = vec![circles[chain[b].circle]];
    let mut cur = chain[b].next;
    while cur != b {
        boundary.push(circles[chain[cur].circle]);
        cur = chain[cur].next;
    }
    let e = enclose(&boundary);
    trace!(r = e.r, "front chain closed");
    for c in circles.iter_mut() {
        c.x -= e.x;
        c.y -= e.y;
    }
    e.r
}

/// Minimal enclosing circle of a set of circles (Welzl's move-to-front
/// algorithm). Runs over the input in order, with no random shuffle, so the
/// result is reproducible for a given sibling ordering.
pub fn enclose(circles: &[Circle]) -> Circle {
    let n = circles.len();
    let mut basis: Vec<Circle> = Vec::with_capacity(3);
    let mut e: Option<Circle> = None;
    let mut i = 0;
    while i < n {
        let p = circles[i];
        match e {
            Some(ref cur) if encloses_weak(cur, &p) => i += 1,
            _ => {
                basis = extend_basis(&basis, p);
                e = Some(enclose_basis(&basis));
                i = 0;
            }
        }
    }
    e.unwrap_or(Circle { x: 0.0, y: 0.0, r: 0.0 })
}

fn extend_basis(basis: &[Circle], p: Circle) -> Vec<Circle> {
    if encloses_weak_all(&p, basis) {
        return vec![p];
    }

    for a in basis {
        if encloses_not(&p, a) && encloses_weak_all(&enclose_basis2(a, &p), basis) {
            return vec![*a, p];
        }
    }

    for i in 0..basis.len().saturating_sub(1) {
        for j in (i + 1)..basis.len() {
            let a = &basis[i];
            let b = &basis[j];
            if encloses_not(&enclose_basis2(a, b), &p)
                && encloses_not(&enclose_basis2(a, &p), b)
                && encloses_not(&enclose_basis2(b, &p), a)
                && encloses_weak_all(&enclose_basis3(a, b, &p), basis)
            {
                return vec![*a, *b, p];
            }
        }
    }

    // Unreachable for consistent input: some pair or triple above must form
    // a valid basis when the single-circle case fails.
    unreachable!("minimal enclosing circle basis exhausted");
}

fn encloses_not(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr < 0.0 || dr * dr < dx * dx + dy * dy
}

fn encloses_weak(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r + a.r.max(b.r).max(1.0) * 1e-9;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

fn encloses_weak_all(a: &Circle, basis: &[Circle]) -> bool {
    basis.iter().all(|b| encloses_weak(a, b))
}

fn enclose_basis(basis: &[Circle]) -> Circle {
    match basis {
        [a] => *a,
        [a, b] => enclose_basis2(a, b),
        [a, b, c] => enclose_basis3(a, b, c),
        _ => unreachable!("enclosing basis holds at most three circles"),
    }
}

fn enclose_basis2(a: &Circle, b: &Circle) -> Circle {
    let x21 = b.x - a.x;
    let y21 = b.y - a.y;
    let r21 = b.r - a.r;
    let l = (x21 * x21 + y21 * y21).sqrt();
    Circle {
        x: (a.x + b.x + x21 / l * r21) / 2.0,
        y: (a.y + b.y + y21 / l * r21) / 2.0,
        r: (l + a.r + b.r) / 2.0,
    }
}

fn enclose_basis3(a: &Circle, b: &Circle, c: &Circle) -> Circle {
    let a2 = a.x - b.x;
    let a3 = a.x - c.x;
    let b2 = a.y - b.y;
    let b3 = a.y - c.y;
    let c2 = b.r - a.r;
    let c3 = c.r - a.r;
    let d1 = a.x * a.x + a.y * a.y - a.r * a.r;
    let d2 = d1 - b.x * b.x - b.y * b.y + b.r * b.r;
    let d3 = d1 - c.x * c.x - c.y * c.y + c.r * c.r;
    let ab = a3 * b2 - a2 * b3;
    let xa = (b2 * d3 - b3 * d2) / (ab * 2.0) - a.x;
    let xb = (b3 * c2 - b2 * c3) / ab;
    let ya = (a3 * d2 - a2 * d3) / (ab * 2.0) - a.y;
    let yb = (a2 * c3 - a3 * c2) / ab;
    let qa = xb * xb + yb * yb - 1.0;
    let qb = 2.0 * (a.r + xa * xb + ya * yb);
    let qc = xa * xa + ya * ya - a.r * a.r;
    let r = -if qa.abs() > 1e-6 {
        (qb + (qb * qb - 4.0 * qa * qc).sqrt()) / (2.0 * qa)
    } else {
        qc / qb
    };
    Circle {
        x: a.x + xa + xb * r,
        y: a.y + ya + yb * r,
        r,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_two_circles_when_packed_then_tangent_on_x_axis() {
        let mut circles = vec![Circle::new(0.0, 0.0, 2.0), Circle::new(0.0, 0.0, 1.0)];
        let r = pack_siblings(&mut circles);
        assert_eq!(r, 3.0);
        let d = circles[0].center_distance(&circles[1]);
        assert!((d - 3.0).abs() < 1e-9);
    }

    #[test]
    fn given_equal_circles_when_packed_then_none_overlap() {
        let mut circles = vec![Circle::new(0.0, 0.0, 1.0); 8];
        let r = pack_siblings(&mut circles);
        assert!(r > 0.0);
        for i in 0..circles.len() {
            for j in (i + 1)..circles.len() {
                let d = circles[i].center_distance(&circles[j]);
                assert!(
                    d >= circles[i].r + circles[j].r - 1e-6,
                    "circles {} and {} overlap: d={}",
                    i,
                    j,
                    d
                );
            }
        }
    }

    #[test]
    fn given_packed_circles_when_enclosed_then_all_contained() {
        let mut circles: Vec<Circle> = (1..=6)
            .map(|i| Circle::new(0.0, 0.0, i as f64))
            .collect();
        let r = pack_siblings(&mut circles);
        let e = Circle::new(0.0, 0.0, r);
        for c in &circles {
            assert!(e.contains(c, 1e-6), "{:?} escapes enclosing radius {}", c, r);
        }
    }

    #[test]
    fn given_same_input_when_packed_twice_then_identical_positions() {
        let radii = [5.0, 3.0, 3.0, 2.0, 1.0, 1.0, 0.5];
        let mut first: Vec<Circle> = radii.iter().map(|&r| Circle::new(0.0, 0.0, r)).collect();
        let mut second = first.clone();
        let r1 = pack_siblings(&mut first);
        let r2 = pack_siblings(&mut second);
        assert_eq!(r1, r2);
        assert_eq!(first, second);
    }
}
