// Copyright 2025 Irreducible Inc.
//! Classical mirror of every kernel.
//!
//! These functions compute the same integers, field elements and points as the reversible
//! kernels, using the very same projective formulas, so results can be compared bit for bit.
//! Values are in plain (not Montgomery) representation.

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};

/// `x⁻¹ mod m`, or zero when `x` has no inverse (in particular for `x = 0`).
pub fn mod_inverse(x: &BigUint, m: &BigUint) -> BigUint {
	let x = BigInt::from_biguint(Sign::Plus, x % m);
	let m_int = BigInt::from_biguint(Sign::Plus, m.clone());
	let egcd = x.extended_gcd(&m_int);
	if !egcd.gcd.is_one() {
		return BigUint::zero();
	}
	egcd.x
		.mod_floor(&m_int)
		.to_biguint()
		.expect("mod_floor by a positive modulus is non-negative")
}

/// `2^n mod m`.
pub fn montgomery_radix(n: usize, m: &BigUint) -> BigUint {
	(BigUint::one() << n) % m
}

/// `x · 2^n mod m`.
pub fn to_montgomery(x: &BigUint, n: usize, m: &BigUint) -> BigUint {
	(x << n) % m
}

/// `x · 2^-n mod m`.
pub fn from_montgomery(x: &BigUint, n: usize, m: &BigUint) -> BigUint {
	x * mod_inverse(&montgomery_radix(n, m), m) % m
}

/// `a · b · 2^-n mod m`.
pub fn montgomery_mul(a: &BigUint, b: &BigUint, n: usize, m: &BigUint) -> BigUint {
	from_montgomery(&(a * b % m), n, m)
}

/// Element `re + im·i` of the quadratic extension.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Fp2 {
	/// Real part.
	pub re: BigUint,
	/// Imaginary part.
	pub im: BigUint,
}

impl Fp2 {
	/// Builds an element from its parts.
	pub fn new(re: impl Into<BigUint>, im: impl Into<BigUint>) -> Self {
		Self {
			re: re.into(),
			im: im.into(),
		}
	}

	/// Additive identity.
	pub fn zero() -> Self {
		Self::default()
	}

	/// Multiplicative identity.
	pub fn one() -> Self {
		Self::new(1u32, 0u32)
	}

	/// Returns `true` for the additive identity.
	pub fn is_zero(&self) -> bool {
		self.re.is_zero() && self.im.is_zero()
	}
}

/// `F_p[i] / (i² + 1)`. `p` must be a prime congruent to 3 mod 4 for this to be a field.
#[derive(Clone, Debug)]
pub struct ExtField {
	/// Characteristic.
	pub p: BigUint,
}

impl ExtField {
	/// The extension of `F_p`.
	pub fn new(p: impl Into<BigUint>) -> Self {
		Self { p: p.into() }
	}

	fn sub_p(&self, a: &BigUint, b: &BigUint) -> BigUint {
		(a + &self.p - b % &self.p) % &self.p
	}

	/// Embeds `F_p`.
	pub fn from_base(&self, x: impl Into<BigUint>) -> Fp2 {
		Fp2 {
			re: x.into() % &self.p,
			im: BigUint::zero(),
		}
	}

	/// `a + b`.
	pub fn add(&self, a: &Fp2, b: &Fp2) -> Fp2 {
		Fp2 {
			re: (&a.re + &b.re) % &self.p,
			im: (&a.im + &b.im) % &self.p,
		}
	}

	/// `a - b`.
	pub fn sub(&self, a: &Fp2, b: &Fp2) -> Fp2 {
		Fp2 {
			re: self.sub_p(&a.re, &b.re),
			im: self.sub_p(&a.im, &b.im),
		}
	}

	/// `-a`.
	pub fn neg(&self, a: &Fp2) -> Fp2 {
		self.sub(&Fp2::zero(), a)
	}

	/// `a · b`.
	pub fn mul(&self, a: &Fp2, b: &Fp2) -> Fp2 {
		let ac = &a.re * &b.re;
		let bd = &a.im * &b.im;
		let ad = &a.re * &b.im;
		let bc = &a.im * &b.re;
		Fp2 {
			re: self.sub_p(&(ac % &self.p), &(bd % &self.p)),
			im: (ad + bc) % &self.p,
		}
	}

	/// `a²`.
	pub fn sqr(&self, a: &Fp2) -> Fp2 {
		self.mul(a, a)
	}

	/// `a⁻¹`, with `0⁻¹ = 0`.
	pub fn inv(&self, a: &Fp2) -> Fp2 {
		let norm = (&a.re * &a.re + &a.im * &a.im) % &self.p;
		let norm_inv = mod_inverse(&norm, &self.p);
		Fp2 {
			re: &a.re * &norm_inv % &self.p,
			im: self.sub_p(&BigUint::zero(), &(&a.im * &norm_inv % &self.p)),
		}
	}

	/// `num / den`, with division by zero yielding zero.
	pub fn div(&self, num: &Fp2, den: &Fp2) -> Fp2 {
		self.mul(num, &self.inv(den))
	}

	/// `a^e`.
	pub fn pow(&self, a: &Fp2, e: &BigUint) -> Fp2 {
		let mut acc = Fp2::one();
		for i in (0..e.bits()).rev() {
			acc = self.sqr(&acc);
			if e.bit(i) {
				acc = self.mul(&acc, a);
			}
		}
		acc
	}

	/// Returns `true` if `a` has a square root.
	pub fn is_square(&self, a: &Fp2) -> bool {
		let norm = (&a.re * &a.re + &a.im * &a.im) % &self.p;
		if norm.is_zero() {
			return true;
		}
		let e = (&self.p - 1u32) >> 1;
		norm.modpow(&e, &self.p).is_one()
	}

	/// A square root of `a`, for `p ≡ 3 mod 4`.
	pub fn sqrt(&self, a: &Fp2) -> Option<Fp2> {
		if a.is_zero() {
			return Some(Fp2::zero());
		}
		if !self.is_square(a) {
			return None;
		}
		let a1 = self.pow(a, &((&self.p - 3u32) >> 2));
		let alpha = self.mul(&self.sqr(&a1), a);
		let x0 = self.mul(&a1, a);
		let minus_one = self.neg(&Fp2::one());
		let root = if alpha == minus_one {
			Fp2 {
				re: self.sub_p(&BigUint::zero(), &x0.im),
				im: x0.re.clone(),
			}
		} else {
			let b = self.pow(&self.add(&Fp2::one(), &alpha), &((&self.p - 1u32) >> 1));
			self.mul(&b, &x0)
		};
		debug_assert_eq!(&self.sqr(&root), a);
		Some(root)
	}
}

/// Affine point on a short Weierstrass curve over `F_p`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AffinePoint {
	/// x-coordinate, ignored for the identity.
	pub x: BigUint,
	/// y-coordinate, ignored for the identity.
	pub y: BigUint,
	/// `false` for the point at infinity.
	pub finite: bool,
}

impl AffinePoint {
	/// A finite point.
	pub fn new(x: impl Into<BigUint>, y: impl Into<BigUint>) -> Self {
		Self {
			x: x.into(),
			y: y.into(),
			finite: true,
		}
	}

	/// The point at infinity.
	pub fn identity() -> Self {
		Self {
			x: BigUint::zero(),
			y: BigUint::zero(),
			finite: false,
		}
	}
}

/// `y² = x³ + a·x + b` over `F_p`.
#[derive(Clone, Debug)]
pub struct WeierstrassCurve {
	/// Linear coefficient.
	pub a: BigUint,
	/// Constant coefficient.
	pub b: BigUint,
	/// Field characteristic.
	pub p: BigUint,
}

impl WeierstrassCurve {
	/// Builds the curve.
	pub fn new(a: impl Into<BigUint>, b: impl Into<BigUint>, p: impl Into<BigUint>) -> Self {
		Self {
			a: a.into(),
			b: b.into(),
			p: p.into(),
		}
	}

	fn sub_p(&self, a: &BigUint, b: &BigUint) -> BigUint {
		(a + &self.p - b % &self.p) % &self.p
	}

	/// Returns `true` if `pt` satisfies the curve equation.
	pub fn contains(&self, pt: &AffinePoint) -> bool {
		if !pt.finite {
			return true;
		}
		let lhs = &pt.y * &pt.y % &self.p;
		let rhs = (&pt.x * &pt.x * &pt.x + &self.a * &pt.x + &self.b) % &self.p;
		lhs == rhs
	}

	/// `-pt`.
	pub fn neg(&self, pt: &AffinePoint) -> AffinePoint {
		if !pt.finite {
			return pt.clone();
		}
		AffinePoint::new(pt.x.clone(), self.sub_p(&BigUint::zero(), &pt.y))
	}

	/// Full group law, exceptional cases included.
	pub fn add(&self, p1: &AffinePoint, p2: &AffinePoint) -> AffinePoint {
		if !p1.finite {
			return p2.clone();
		}
		if !p2.finite {
			return p1.clone();
		}
		let lambda = if p1.x == p2.x {
			if (&p1.y + &p2.y) % &self.p == BigUint::zero() {
				return AffinePoint::identity();
			}
			let num = (3u32 * &p1.x * &p1.x + &self.a) % &self.p;
			let den = (2u32 * &p1.y) % &self.p;
			num * mod_inverse(&den, &self.p) % &self.p
		} else {
			let num = self.sub_p(&p2.y, &p1.y);
			let den = self.sub_p(&p2.x, &p1.x);
			num * mod_inverse(&den, &self.p) % &self.p
		};
		let x3 = self.sub_p(&self.sub_p(&(&lambda * &lambda), &p1.x), &p2.x);
		let y3 = self.sub_p(&(&lambda * self.sub_p(&p1.x, &x3)), &p1.y);
		AffinePoint::new(x3, y3)
	}

	/// `k · pt` by double-and-add.
	pub fn mul(&self, k: &BigUint, pt: &AffinePoint) -> AffinePoint {
		let mut acc = AffinePoint::identity();
		for i in (0..k.bits()).rev() {
			acc = self.add(&acc, &acc);
			if k.bit(i) {
				acc = self.add(&acc, pt);
			}
		}
		acc
	}
}

/// Projective x-only point `(X : Z)` on a Montgomery curve over the extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XzPoint {
	/// Numerator of the affine x.
	pub x: Fp2,
	/// Denominator of the affine x.
	pub z: Fp2,
}

impl XzPoint {
	/// Builds `(x : z)`.
	pub fn new(x: Fp2, z: Fp2) -> Self {
		Self { x, z }
	}

	/// The affine point with the given x, i.e. `(x : 1)`.
	pub fn from_affine_x(x: Fp2) -> Self {
		Self { x, z: Fp2::one() }
	}

	/// Returns `true` for `(X : 0)`, the identity.
	pub fn is_identity(&self) -> bool {
		self.z.is_zero()
	}
}

/// Montgomery curve in the `(A24+ : C24) = (A + 2C : 4C)` convention.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MontCurve {
	/// `A + 2C`.
	pub a24: Fp2,
	/// `4C`.
	pub c24: Fp2,
}

/// Montgomery curve in the `(A : C)` convention.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MontCurveAc {
	/// Quadratic coefficient numerator.
	pub a: Fp2,
	/// Common denominator.
	pub c: Fp2,
}

impl ExtField {
	/// `(A : C) -> (A + 2C : 4C)`.
	pub fn a24_from_ac(&self, curve: &MontCurveAc) -> MontCurve {
		let c2 = self.add(&curve.c, &curve.c);
		MontCurve {
			a24: self.add(&curve.a, &c2),
			c24: self.add(&c2, &c2),
		}
	}

	/// Exact inverse of [`a24_from_ac`](Self::a24_from_ac).
	pub fn ac_from_a24(&self, curve: &MontCurve) -> MontCurveAc {
		let half = mod_inverse(&BigUint::from(2u32), &self.p);
		let half = self.from_base(half);
		let c2 = self.mul(&curve.c24, &half);
		let c = self.mul(&c2, &half);
		MontCurveAc {
			a: self.sub(&curve.a24, &c2),
			c,
		}
	}

	/// x-only doubling.
	pub fn xdbl(&self, pt: &XzPoint, curve: &MontCurve) -> XzPoint {
		let sq_minus = self.sqr(&self.sub(&pt.x, &pt.z));
		let sq_plus = self.sqr(&self.add(&pt.x, &pt.z));
		let e = self.sub(&sq_plus, &sq_minus);
		let c0 = self.mul(&curve.c24, &sq_minus);
		let x = self.mul(&c0, &sq_plus);
		let w = self.add(&c0, &self.mul(&curve.a24, &e));
		let z = self.mul(&w, &e);
		XzPoint { x, z }
	}

	/// `[2^e] pt`.
	pub fn xdble(&self, pt: &XzPoint, e: usize, curve: &MontCurve) -> XzPoint {
		(0..e).fold(pt.clone(), |acc, _| self.xdbl(&acc, curve))
	}

	/// x-only differential addition: `x(P + Q)` from `x(P)`, `x(Q)` and `x(Q - P)`.
	pub fn xadd(&self, p: &XzPoint, q: &XzPoint, q_minus_p: &XzPoint) -> XzPoint {
		let u = self.mul(&self.sub(&q.x, &q.z), &self.add(&p.x, &p.z));
		let v = self.mul(&self.add(&q.x, &q.z), &self.sub(&p.x, &p.z));
		XzPoint {
			x: self.mul(&q_minus_p.z, &self.sqr(&self.add(&u, &v))),
			z: self.mul(&q_minus_p.x, &self.sqr(&self.sub(&u, &v))),
		}
	}

	/// `x(P + [s]Q)` by the three-point ladder over the low `bits` bits of `s`.
	pub fn ladder3pt(
		&self,
		curve: &MontCurve,
		p: &XzPoint,
		q: &XzPoint,
		q_minus_p: &XzPoint,
		s: &BigUint,
		bits: usize,
	) -> XzPoint {
		let mut r0 = q.clone();
		let mut r1 = p.clone();
		let mut r2 = q_minus_p.clone();
		for i in 0..bits {
			if s.bit(i as u64) {
				r1 = self.xadd(&r0, &r1, &r2);
			} else {
				r2 = self.xadd(&r0, &r2, &r1);
			}
			r0 = self.xdbl(&r0, curve);
		}
		r1
	}

	/// `x([k] pt)` by the two-point Montgomery ladder.
	pub fn xmul(&self, pt: &XzPoint, k: &BigUint, curve: &MontCurve) -> XzPoint {
		let mut r0 = XzPoint::new(Fp2::one(), Fp2::zero());
		let mut r1 = pt.clone();
		for i in (0..k.bits()).rev() {
			if k.bit(i) {
				r0 = self.xadd(&r1, &r0, pt);
				r1 = self.xdbl(&r1, curve);
			} else {
				r1 = self.xadd(&r0, &r1, pt);
				r0 = self.xdbl(&r0, curve);
			}
		}
		r0
	}

	/// Codomain of the 2-isogeny with kernel `⟨kernel⟩`.
	pub fn isog2_curve(&self, kernel: &XzPoint) -> MontCurve {
		let zz = self.sqr(&kernel.z);
		let xx = self.sqr(&kernel.x);
		MontCurve {
			a24: self.sub(&zz, &xx),
			c24: zz,
		}
	}

	/// Image of `pt` under the 2-isogeny with kernel `⟨kernel⟩`.
	pub fn isog2_point(&self, kernel: &XzPoint, pt: &XzPoint) -> XzPoint {
		let t0 = self.mul(&self.add(&kernel.x, &kernel.z), &self.sub(&pt.x, &pt.z));
		let t1 = self.mul(&self.sub(&kernel.x, &kernel.z), &self.add(&pt.x, &pt.z));
		XzPoint {
			x: self.mul(&pt.x, &self.add(&t0, &t1)),
			z: self.mul(&pt.z, &self.sub(&t0, &t1)),
		}
	}

	/// `j = 256 (A² - 3C²)³ / (C⁴ (A² - 4C²))`, zero when the denominator vanishes.
	pub fn j_invariant(&self, curve: &MontCurveAc) -> Fp2 {
		let aa = self.sqr(&curve.a);
		let cc = self.sqr(&curve.c);
		let cc3 = self.add(&self.add(&cc, &cc), &cc);
		let t = self.sub(&aa, &cc3);
		let num = self.mul(&self.sqr(&t), &t);
		let num = (0..8).fold(num, |acc, _| self.add(&acc, &acc));
		let den = self.mul(&self.sqr(&cc), &self.sub(&t, &cc));
		self.div(&num, &den)
	}

	/// The j-invariant reached by the 2-isogeny walk with kernel `⟨P + [s]Q⟩`.
	pub fn walk(
		&self,
		curve: &MontCurve,
		p: &XzPoint,
		q: &XzPoint,
		q_minus_p: &XzPoint,
		s: &BigUint,
		height: usize,
	) -> Fp2 {
		let mut kernel = self.ladder3pt(curve, p, q, q_minus_p, s, height);
		let mut curve = curve.clone();
		for step in 0..height {
			let order_two = self.xdble(&kernel, height - 1 - step, &curve);
			let next = self.isog2_curve(&order_two);
			if step + 1 < height {
				kernel = self.isog2_point(&order_two, &kernel);
			}
			curve = next;
		}
		self.j_invariant(&self.ac_from_a24(&curve))
	}

	/// Affine x-coordinate `X / Z`.
	pub fn affine_x(&self, pt: &XzPoint) -> Fp2 {
		self.div(&pt.x, &pt.z)
	}

	/// A basis `(P, Q, Q - P)` of the `2^height`-torsion, as affine x-only points.
	///
	/// The curve must be supersingular with `(p + 1)²` points over `F_p²`. `[2^(height-1)]Q` is
	/// the point `(0, 0)` and `[2^(height-1)]P` is not, so every kernel `⟨P + [s]Q⟩` avoids
	/// `x = 0` at its order-two multiple. Points are searched deterministically from `x = 1`.
	/// Returns `None` if `2^height` does not divide `p + 1` or no basis is found.
	pub fn torsion_basis(&self, curve: &MontCurveAc, height: usize) -> Option<(XzPoint, XzPoint, XzPoint)> {
		if height == 0 {
			return None;
		}
		let (cofactor, rem) = (&self.p + 1u32).div_rem(&(BigUint::one() << height));
		if !rem.is_zero() {
			return None;
		}
		let a = self.div(&curve.a, &curve.c);
		let rhs = |x: &Fp2| {
			let xx = self.sqr(x);
			self.add(&self.add(&self.mul(&xx, x), &self.mul(&a, &xx)), x)
		};
		let a24 = self.a24_from_ac(curve);

		let mut p_x = None;
		let mut q_x = None;
		'search: for t in 1u32.. {
			if BigUint::from(t) >= self.p {
				break;
			}
			for im in 0u32..2 {
				let x = Fp2::new(t, im);
				if !self.is_square(&rhs(&x)) {
					continue;
				}
				let pt = self.xmul(&XzPoint::from_affine_x(x), &cofactor, &a24);
				let half = self.xdble(&pt, height - 1, &a24);
				if half.is_identity() {
					continue;
				}
				let slot = if half.x.is_zero() { &mut q_x } else { &mut p_x };
				if slot.is_none() {
					*slot = Some(self.affine_x(&pt));
				}
				if p_x.is_some() && q_x.is_some() {
					break 'search;
				}
			}
		}
		let (xp, xq) = (p_x?, q_x?);

		// Any choice of square roots yields a consistent triple, up to replacing Q by -Q.
		let yp = self.sqrt(&rhs(&xp))?;
		let yq = self.sqrt(&rhs(&xq))?;
		let lambda = self.div(&self.add(&yq, &yp), &self.sub(&xq, &xp));
		let x_diff = self.sub(&self.sub(&self.sub(&self.sqr(&lambda), &a), &xp), &xq);
		Some((
			XzPoint::from_affine_x(xp),
			XzPoint::from_affine_x(xq),
			XzPoint::from_affine_x(x_diff),
		))
	}
}
