//! [`HostBridge`] over a thread-bound `JNIEnv`.

use std::ffi::{CStr, CString};
use std::fmt;

use jni::errors::Error as JniError;
use jni::objects::{JClass, JMethodID, JObject, JStaticMethodID, JString, JValue, JValueOwned};
use jni::signature::{JavaType, Primitive, ReturnType, TypeSignature};
use jni::sys::jvalue;
use jni::JNIEnv;

use crate::{
    Arg, BridgeError, BridgeResult, ClassHandle, FieldHandle, HostBridge, MethodHandle,
    ObjectHandle, StaticMethodHandle, Value,
};

struct Method<Id> {
    id: Id,
    signature: TypeSignature,
}

struct StaticField {
    name: String,
    signature: String,
    ty: ReturnType,
}

/// Bridge over the `JNIEnv` of the current native call.
///
/// Every class and object reference it creates is a local reference kept in
/// a per-bridge table, so handles stay valid until the native frame returns.
pub struct JniBridge<'local> {
    env: JNIEnv<'local>,
    classes: Vec<JClass<'local>>,
    methods: Vec<Method<JMethodID>>,
    static_methods: Vec<Method<JStaticMethodID>>,
    fields: Vec<StaticField>,
    objects: Vec<JObject<'local>>,
}

impl fmt::Debug for JniBridge<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JniBridge")
            .field("classes", &self.classes.len())
            .field("objects", &self.objects.len())
            .finish_non_exhaustive()
    }
}

impl<'local> JniBridge<'local> {
    /// Wrap an attached environment.
    #[must_use]
    pub const fn new(env: JNIEnv<'local>) -> Self {
        Self {
            env,
            classes: Vec::new(),
            methods: Vec::new(),
            static_methods: Vec::new(),
            fields: Vec::new(),
            objects: Vec::new(),
        }
    }

    /// Wrap a raw `JNIEnv*` received across the C boundary.
    ///
    /// # Safety
    /// `env` must be a valid `JNIEnv` pointer for the current thread and
    /// outlive `'local`.
    ///
    /// # Errors
    /// Fails if `env` is null.
    pub unsafe fn from_raw(env: *mut jni::sys::JNIEnv) -> BridgeResult<Self> {
        // SAFETY: forwarded from the caller.
        let env = unsafe { JNIEnv::from_raw(env) }.map_err(platform)?;
        Ok(Self::new(env))
    }

    /// Register an object owned by the caller so it can be passed to bridge calls.
    pub fn adopt(&mut self, object: JObject<'local>) -> ObjectHandle {
        self.objects.push(object);
        ObjectHandle::from_index(self.objects.len() - 1)
    }

    fn clear_exception(&mut self) {
        if self.env.exception_check().unwrap_or(false) {
            if let Err(err) = self.env.exception_clear() {
                log::warn!("failed to clear pending Java exception: {err}");
            }
        }
    }

    /// Map a JNI result, clearing any exception it left pending.
    fn settle<T>(
        &mut self,
        result: jni::errors::Result<T>,
        on_exception: impl FnOnce() -> BridgeError,
    ) -> BridgeResult<T> {
        match result {
            Ok(value) => Ok(value),
            Err(
                JniError::JavaException
                | JniError::MethodNotFound { .. }
                | JniError::FieldNotFound { .. }
                | JniError::NullPtr(_),
            ) => {
                self.clear_exception();
                Err(on_exception())
            }
            Err(err) => {
                self.clear_exception();
                Err(platform(err))
            }
        }
    }

    fn object(&self, handle: ObjectHandle) -> BridgeResult<&JObject<'local>> {
        self.objects
            .get(handle.index())
            .ok_or(BridgeError::InvalidHandle)
    }

    fn lift(&mut self, value: JValueOwned<'local>, ty: &ReturnType) -> BridgeResult<Value> {
        let lifted = match ty {
            ReturnType::Primitive(Primitive::Void) => value.v().map(|()| Value::Void),
            ReturnType::Primitive(Primitive::Boolean) => value.z().map(Value::Bool),
            ReturnType::Primitive(Primitive::Int) => value.i().map(Value::Int),
            ReturnType::Primitive(Primitive::Double) => value.d().map(Value::Double),
            ReturnType::Primitive(other) => {
                return Err(BridgeError::Platform(format!(
                    "unsupported return type {other:?}"
                )));
            }
            ReturnType::Object | ReturnType::Array => {
                let object = value.l().map_err(platform)?;
                if object.is_null() {
                    return Ok(Value::Object(None));
                }
                return Ok(Value::Object(Some(self.adopt(object))));
            }
        };
        lifted.map_err(platform)
    }

    fn lower(&self, signature: &TypeSignature, args: &[Arg]) -> BridgeResult<Vec<jvalue>> {
        if signature.args.len() != args.len() {
            return Err(BridgeError::Platform(format!(
                "expected {} arguments, got {}",
                signature.args.len(),
                args.len()
            )));
        }

        signature
            .args
            .iter()
            .zip(args)
            .map(|(ty, arg)| match (ty, arg) {
                (JavaType::Primitive(Primitive::Int), Arg::Int(value)) => {
                    Ok(JValue::Int(*value).as_jni())
                }
                (JavaType::Object(_) | JavaType::Array(_), Arg::Object(handle)) => {
                    Ok(JValue::Object(self.object(*handle)?).as_jni())
                }
                (_, Arg::Int(_)) => Err(BridgeError::UnexpectedValue {
                    expected: "object",
                    found: "int",
                }),
                (_, Arg::Object(_)) => Err(BridgeError::UnexpectedValue {
                    expected: "primitive",
                    found: "object",
                }),
            })
            .collect()
    }
}

impl HostBridge for JniBridge<'_> {
    fn find_class(&mut self, name: &str) -> BridgeResult<ClassHandle> {
        let result = self.env.find_class(name);
        let class = self.settle(result, || BridgeError::ClassNotFound {
            name: name.to_owned(),
        })?;
        self.classes.push(class);
        Ok(ClassHandle::from_index(self.classes.len() - 1))
    }

    fn object_class(&mut self, object: ObjectHandle) -> BridgeResult<ClassHandle> {
        let target = self
            .objects
            .get(object.index())
            .ok_or(BridgeError::InvalidHandle)?;
        let result = self.env.get_object_class(target);
        let class = self.settle(result, || BridgeError::Exception {
            during: "GetObjectClass".into(),
        })?;
        self.classes.push(class);
        Ok(ClassHandle::from_index(self.classes.len() - 1))
    }

    fn find_method(
        &mut self,
        class: ClassHandle,
        name: &str,
        signature: &str,
    ) -> BridgeResult<MethodHandle> {
        let parsed = TypeSignature::from_str(signature).map_err(platform)?;
        let class = self
            .classes
            .get(class.index())
            .ok_or(BridgeError::InvalidHandle)?;
        let result = self.env.get_method_id(class, name, signature);
        let id = self.settle(result, || BridgeError::MethodNotFound {
            name: name.to_owned(),
            signature: signature.to_owned(),
        })?;
        self.methods.push(Method {
            id,
            signature: parsed,
        });
        Ok(MethodHandle::from_index(self.methods.len() - 1))
    }

    fn find_static_method(
        &mut self,
        class: ClassHandle,
        name: &str,
        signature: &str,
    ) -> BridgeResult<StaticMethodHandle> {
        let parsed = TypeSignature::from_str(signature).map_err(platform)?;
        let class = self
            .classes
            .get(class.index())
            .ok_or(BridgeError::InvalidHandle)?;
        let result = self.env.get_static_method_id(class, name, signature);
        let id = self.settle(result, || BridgeError::MethodNotFound {
            name: name.to_owned(),
            signature: signature.to_owned(),
        })?;
        self.static_methods.push(Method {
            id,
            signature: parsed,
        });
        Ok(StaticMethodHandle::from_index(self.static_methods.len() - 1))
    }

    fn find_static_field(
        &mut self,
        class: ClassHandle,
        name: &str,
        signature: &str,
    ) -> BridgeResult<FieldHandle> {
        // A field descriptor is the return type of a nullary method.
        let ty = TypeSignature::from_str(format!("(){signature}"))
            .map_err(platform)?
            .ret;
        let class = self
            .classes
            .get(class.index())
            .ok_or(BridgeError::InvalidHandle)?;
        let result = self.env.get_static_field_id(class, name, signature);
        self.settle(result, || BridgeError::FieldNotFound {
            name: name.to_owned(),
            signature: signature.to_owned(),
        })?;
        self.fields.push(StaticField {
            name: name.to_owned(),
            signature: signature.to_owned(),
            ty,
        });
        Ok(FieldHandle::from_index(self.fields.len() - 1))
    }

    fn get_static_field(&mut self, class: ClassHandle, field: FieldHandle) -> BridgeResult<Value> {
        let field = self
            .fields
            .get(field.index())
            .ok_or(BridgeError::InvalidHandle)?;
        let (name, ty) = (field.name.clone(), field.ty.clone());
        let class = self
            .classes
            .get(class.index())
            .ok_or(BridgeError::InvalidHandle)?;
        let result = self
            .env
            .get_static_field(class, &field.name, &field.signature);
        let value = self.settle(result, || BridgeError::Exception {
            during: format!("GetStaticField {name}"),
        })?;
        self.lift(value, &ty)
    }

    fn call_method(
        &mut self,
        target: ObjectHandle,
        method: MethodHandle,
        args: &[Arg],
    ) -> BridgeResult<Value> {
        let method = self
            .methods
            .get(method.index())
            .ok_or(BridgeError::InvalidHandle)?;
        let (id, ret) = (method.id, method.signature.ret.clone());
        let args = self.lower(&method.signature, args)?;
        let target = self
            .objects
            .get(target.index())
            .ok_or(BridgeError::InvalidHandle)?;
        // SAFETY: `id` was resolved with the signature `args` were checked
        // against, and `ret` is that signature's return type.
        let result = unsafe { self.env.call_method_unchecked(target, id, ret.clone(), &args) };
        let value = self.settle(result, || BridgeError::Exception {
            during: "CallMethod".into(),
        })?;
        self.lift(value, &ret)
    }

    fn call_static_method(
        &mut self,
        class: ClassHandle,
        method: StaticMethodHandle,
        args: &[Arg],
    ) -> BridgeResult<Value> {
        let method = self
            .static_methods
            .get(method.index())
            .ok_or(BridgeError::InvalidHandle)?;
        let (id, ret) = (method.id, method.signature.ret.clone());
        let args = self.lower(&method.signature, args)?;
        let class = self
            .classes
            .get(class.index())
            .ok_or(BridgeError::InvalidHandle)?;
        // SAFETY: as in `call_method`; `class` is the class `id` was resolved on.
        let result =
            unsafe { self.env.call_static_method_unchecked(class, id, ret.clone(), &args) };
        let value = self.settle(result, || BridgeError::Exception {
            during: "CallStaticMethod".into(),
        })?;
        self.lift(value, &ret)
    }

    fn new_string(&mut self, text: &str) -> BridgeResult<ObjectHandle> {
        let result = self.env.new_string(text);
        let string = self.settle(result, || BridgeError::Exception {
            during: "NewStringUTF".into(),
        })?;
        Ok(self.adopt(JObject::from(string)))
    }

    fn new_string_array(&mut self, items: &[&str]) -> BridgeResult<ObjectHandle> {
        let length = i32::try_from(items.len())
            .map_err(|_| BridgeError::Platform("string array too long".into()))?;
        let result = self
            .env
            .new_object_array(length, "java/lang/String", JObject::null());
        let array = self.settle(result, || BridgeError::Exception {
            during: "NewObjectArray".into(),
        })?;

        for (index, item) in (0..length).zip(items) {
            let result = self.env.new_string(item);
            let element = self.settle(result, || BridgeError::Exception {
                during: "NewStringUTF".into(),
            })?;
            let result = self.env.set_object_array_element(&array, index, &element);
            self.settle(result, || BridgeError::Exception {
                during: "SetObjectArrayElement".into(),
            })?;
            if let Err(err) = self.env.delete_local_ref(element) {
                log::warn!("failed to delete local reference: {err}");
            }
        }

        Ok(self.adopt(JObject::from(array)))
    }

    fn read_string(&mut self, string: ObjectHandle) -> BridgeResult<String> {
        let object = self
            .objects
            .get(string.index())
            .ok_or(BridgeError::InvalidHandle)?;
        let string: &JString<'_> = object.into();
        // The UTF chars view is released when the `JavaStr` drops.
        let result = self.env.get_string(string).map(String::from);
        self.settle(result, || BridgeError::UnexpectedValue {
            expected: "string",
            found: "object",
        })
    }

    fn read_utf_chars(&mut self, string: ObjectHandle) -> BridgeResult<CString> {
        let object = self
            .objects
            .get(string.index())
            .ok_or(BridgeError::InvalidHandle)?;
        let string: &JString<'_> = object.into();
        let result = self.env.get_string(string).map(|chars| {
            // SAFETY: `get_raw` is the NUL-terminated view owned by `chars`,
            // which stays alive until the copy is taken.
            unsafe { CStr::from_ptr(chars.get_raw()) }.to_owned()
        });
        self.settle(result, || BridgeError::UnexpectedValue {
            expected: "string",
            found: "object",
        })
    }
}

#[allow(clippy::needless_pass_by_value)]
fn platform(err: JniError) -> BridgeError {
    BridgeError::Platform(err.to_string())
}
