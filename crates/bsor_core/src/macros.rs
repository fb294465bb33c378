/// Declare a struct together with its BSOR field identifiers.
///
/// Each field is written `id => name: Type`. Identifiers must be non-zero and unique
/// within the struct; they are checked when the shape is first used. A field written
/// `_ => name: Type` is excluded: it is never encoded or listed in definitions, and is
/// rebuilt with `Default::default()` when decoding.
///
/// ```
/// bsor::bsor_struct! {
///     #[derive(Debug, PartialEq)]
///     pub struct Point {
///         1 => pub x: i32,
///         2 => pub y: i32,
///         _ => pub hits: u32,
///     }
/// }
///
/// let items = bsor::codec::to_script(&Point { x: 3, y: 0, hits: 9 }).unwrap();
/// assert_eq!(bsor::codec::from_script::<Point>(&items).unwrap(), Point { x: 3, y: 0, hits: 0 });
/// ```
#[macro_export]
macro_rules! bsor_struct {
	(
		$(#[$meta:meta])*
		$vis:vis struct $name:ident { $($body:tt)* }
	) => {
		$crate::__bsor_struct! { @munch [$(#[$meta])*] [$vis] $name [] $($body)* }
	};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __bsor_struct {
	(@munch $attrs:tt $vis:tt $name:ident [$($done:tt)*]) => {
		$crate::__bsor_struct! { @emit $attrs $vis $name $($done)* }
	};
	(
		@munch $attrs:tt $vis:tt $name:ident [$($done:tt)*]
		$(#[$fmeta:meta])* _ => $fvis:vis $field:ident : $ty:ty $(, $($rest:tt)*)?
	) => {
		$crate::__bsor_struct! {
			@munch $attrs $vis $name [$($done)* { [$(#[$fmeta])*] [$fvis] $field [$ty] _ }] $($($rest)*)?
		}
	};
	(
		@munch $attrs:tt $vis:tt $name:ident [$($done:tt)*]
		$(#[$fmeta:meta])* $id:literal => $fvis:vis $field:ident : $ty:ty $(, $($rest:tt)*)?
	) => {
		$crate::__bsor_struct! {
			@munch $attrs $vis $name [$($done)* { [$(#[$fmeta])*] [$fvis] $field [$ty] $id }] $($($rest)*)?
		}
	};
	(
		@emit [$(#[$meta:meta])*] [$vis:vis] $name:ident
		$({ [$(#[$fmeta:meta])*] [$fvis:vis] $field:ident [$ty:ty] $id:tt })*
	) => {
		$(#[$meta])*
		$vis struct $name {
			$(
				$(#[$fmeta])*
				$fvis $field: $ty,
			)*
		}

		impl $crate::codec::Bsor for $name {
			fn shape() -> $crate::codec::Shape {
				fn fields() -> ::std::vec::Vec<$crate::codec::Field> {
					#[allow(unused_mut)]
					let mut out = ::std::vec::Vec::new();
					$(
						$crate::__bsor_field!(@shape out, $id, $field, $ty);
					)*
					out
				}
				$crate::codec::Shape::Struct($crate::codec::StructRef::lazy(::core::stringify!($name), fields))
			}

			fn to_value(&self) -> $crate::codec::Value {
				#[allow(unused_mut)]
				let mut out = $crate::codec::StructValue::new(::core::stringify!($name));
				$(
					$crate::__bsor_field!(@value out, $id, $field, &self.$field);
				)*
				$crate::codec::Value::Struct(out)
			}

			fn from_value(value: $crate::codec::Value) -> $crate::codec::Result<Self> {
				#[allow(unused_mut, unused_variables)]
				let mut item = $crate::codec::typed::expect_struct(value, ::core::stringify!($name))?;
				::core::result::Result::Ok(Self {
					$(
						$field: $crate::__bsor_field!(@take item, $id, $ty),
					)*
				})
			}
		}
	};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __bsor_field {
	(@shape $out:ident, _, $field:ident, $ty:ty) => {};
	(@shape $out:ident, $id:literal, $field:ident, $ty:ty) => {
		$out.push($crate::codec::Field::new(
			::core::stringify!($field),
			$id,
			<$ty as $crate::codec::Bsor>::shape(),
		));
	};
	(@value $out:ident, _, $field:ident, $value:expr) => {};
	(@value $out:ident, $id:literal, $field:ident, $value:expr) => {
		$out.push($id, ::core::stringify!($field), $crate::codec::Bsor::to_value($value));
	};
	(@take $item:ident, _, $ty:ty) => {
		<$ty as ::core::default::Default>::default()
	};
	(@take $item:ident, $id:literal, $ty:ty) => {
		$crate::codec::typed::take_field::<$ty>(&mut $item, $id)?
	};
}

/// Implement [`Bsor`](crate::codec::Bsor) for a [`WellKnownBinary`](crate::codec::WellKnownBinary) type.
#[macro_export]
macro_rules! bsor_well_known {
	($ty:ty) => {
		impl $crate::codec::Bsor for $ty {
			fn shape() -> $crate::codec::Shape {
				$crate::codec::typed::well_known_shape::<$ty>()
			}

			fn to_value(&self) -> $crate::codec::Value {
				$crate::codec::Value::Bytes(<$ty as $crate::codec::WellKnownBinary>::to_binary(self))
			}

			fn from_value(value: $crate::codec::Value) -> $crate::codec::Result<Self> {
				$crate::codec::typed::well_known_from_value::<$ty>(value)
			}
		}
	};
}
